//! Computed styles consumed by the marten layout engine.
//!
//! # Scope
//!
//! This crate is the boundary between the style system (cascade,
//! inheritance, computed-value production — all external to layout) and the
//! layout engine. It provides:
//!
//! - **Value types** ([`values`]) — lengths with unresolved percentages,
//!   `auto`-able lengths, display/position/box-sizing/white-space enums
//!   ([§ 6 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)).
//! - **Writing modes** ([`writing_mode`]) — the three supported modes and
//!   the logical→physical mapping tables
//!   ([CSS Writing Modes Level 4](https://www.w3.org/TR/css-writing-modes-4/)).
//! - **Logical views** ([`logical`]) — flow-relative, read-only accessors
//!   over a physical [`Style`].
//! - **The two style operations layout invokes**:
//!   [`Style::resolve_percentages`] and [`Style::resolve_box_sizing`], both
//!   idempotent against the same containing block.
//!
//! The cascade itself is out of scope: a [`StyleMap`] of ready computed
//! styles per document node is handed in from outside.

pub mod logical;
pub mod values;
pub mod writing_mode;

use std::collections::HashMap;

pub use logical::LogicalStyle;
pub use values::{
    AutoLength, BoxSizing, Display, InnerDisplay, LengthValue, LineHeight, OuterDisplay, Position,
    WhiteSpace,
};
pub use writing_mode::{LogicalAxis, LogicalSide, PhysicalAxis, PhysicalSide, WritingMode};

use marten_dom::NodeId;

/// Read-only computed styles per document node, produced by the external
/// style system and consumed by the box-tree builder.
pub type StyleMap = HashMap<NodeId, Style>;

/// The computed style of one box, as layout consumes it.
///
/// [§ 6 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
///
/// Fields are physical; layout reads them through [`Style::logical`] in the
/// writing mode of the formatting context the box participates in. Each box
/// owns its style (anonymous boxes get a derived one via
/// [`Style::anonymous`]), and layout mutates it in place only through the
/// two resolution operations below.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
    pub display: Display,
    /// [§ 9.3.1 'position'](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
    pub position: Position,
    /// [§ 2 Block Flow Direction](https://www.w3.org/TR/css-writing-modes-4/#block-flow)
    pub writing_mode: WritingMode,
    /// [§ 4.4 box-sizing](https://www.w3.org/TR/css-box-4/#box-sizing)
    pub box_sizing: BoxSizing,
    /// [§ 3 White Space Processing](https://www.w3.org/TR/css-text-3/#white-space-property)
    pub white_space: WhiteSpace,

    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    ///
    /// "Margins can be negative." "The value 'auto' is discussed in the
    /// section on calculating widths and margins."
    pub margin_top: AutoLength,
    /// Right margin.
    pub margin_right: AutoLength,
    /// Bottom margin.
    pub margin_bottom: AutoLength,
    /// Left margin.
    pub margin_left: AutoLength,

    /// [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
    ///
    /// "Unlike margin properties, values for padding values cannot be
    /// negative" and cannot be `auto`.
    pub padding_top: LengthValue,
    /// Right padding.
    pub padding_right: LengthValue,
    /// Bottom padding.
    pub padding_bottom: LengthValue,
    /// Left padding.
    pub padding_left: LengthValue,

    /// [§ 8.5 Border properties](https://www.w3.org/TR/CSS2/box.html#border-properties)
    ///
    /// Used border widths; a border with `border-style: none` computes to
    /// width 0 upstream.
    pub border_top_width: LengthValue,
    /// Right border width.
    pub border_right_width: LengthValue,
    /// Bottom border width.
    pub border_bottom_width: LengthValue,
    /// Left border width.
    pub border_left_width: LengthValue,

    /// [§ 10.2 Content width](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
    pub width: AutoLength,
    /// [§ 10.5 Content height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    pub height: AutoLength,

    /// [§ 3.5 'font-size'](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
    ///
    /// Resolved font size in pixels; 16.0 is the CSS `medium` default.
    pub font_size: f32,
    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    pub line_height: LineHeight,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            display: Display::block(),
            position: Position::Static,
            writing_mode: WritingMode::HorizontalTb,
            box_sizing: BoxSizing::ContentBox,
            white_space: WhiteSpace::Normal,
            margin_top: AutoLength::ZERO,
            margin_right: AutoLength::ZERO,
            margin_bottom: AutoLength::ZERO,
            margin_left: AutoLength::ZERO,
            padding_top: LengthValue::ZERO,
            padding_right: LengthValue::ZERO,
            padding_bottom: LengthValue::ZERO,
            padding_left: LengthValue::ZERO,
            border_top_width: LengthValue::ZERO,
            border_right_width: LengthValue::ZERO,
            border_bottom_width: LengthValue::ZERO,
            border_left_width: LengthValue::ZERO,
            width: AutoLength::Auto,
            height: AutoLength::Auto,
            font_size: 16.0,
            line_height: LineHeight::Normal,
        }
    }
}

impl Style {
    /// A flow-relative view of this style, keyed by `writing_mode` (the
    /// writing mode of the formatting context the box participates in, not
    /// necessarily the box's own).
    #[must_use]
    pub fn logical(&self, writing_mode: WritingMode) -> LogicalStyle<'_> {
        LogicalStyle::new(self, writing_mode)
    }

    /// The computed style of an anonymous box generated inside a box with
    /// this style.
    ///
    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "The properties of anonymous boxes are inherited from the enclosing
    /// non-anonymous box... Non-inherited properties have their initial
    /// value."
    #[must_use]
    pub fn anonymous(&self) -> Style {
        Style {
            writing_mode: self.writing_mode,
            white_space: self.white_space,
            font_size: self.font_size,
            line_height: self.line_height,
            ..Style::default()
        }
    }

    /// Resolve percentage lengths against the containing block.
    ///
    /// [§ 7.2 Abstract Dimensions of CSS Values](https://www.w3.org/TR/css-writing-modes-4/#dimension-mapping)
    ///
    /// "Percentages on the margin and padding properties... are always
    /// calculated with respect to the inline size of the containing
    /// block." Width and height percentages keep their physical
    /// correspondence: `containing_mode` is the containing block's writing
    /// mode and decides which physical axis `inline_base`/`block_base`
    /// measure. A percentage block size degrades to `auto` when its base
    /// is itself not determined
    /// ([§ 10.5](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)).
    ///
    /// Idempotent: pixel values are fixed points, so re-invoking with the
    /// same containing block changes nothing.
    pub fn resolve_percentages(
        &mut self,
        containing_mode: WritingMode,
        inline_base: f32,
        block_base: Option<f32>,
    ) {
        fn against(l: &mut LengthValue, base: f32) {
            if let LengthValue::Percent(p) = *l {
                *l = LengthValue::Px(p * base);
            }
        }
        fn against_auto(l: &mut AutoLength, base: f32) {
            if let AutoLength::Length(LengthValue::Percent(p)) = *l {
                *l = AutoLength::px(p * base);
            }
        }

        // [§ 8.3](https://www.w3.org/TR/CSS2/box.html#margin-properties)
        // "The percentage is calculated with respect to the width of the
        // generated box's containing block" — the inline size, in
        // writing-mode-relative terms.
        against_auto(&mut self.margin_top, inline_base);
        against_auto(&mut self.margin_right, inline_base);
        against_auto(&mut self.margin_bottom, inline_base);
        against_auto(&mut self.margin_left, inline_base);
        against(&mut self.padding_top, inline_base);
        against(&mut self.padding_right, inline_base);
        against(&mut self.padding_bottom, inline_base);
        against(&mut self.padding_left, inline_base);

        let inline_axis = containing_mode.physical_axis(LogicalAxis::Inline);
        let (inline_size, block_size) = match inline_axis {
            PhysicalAxis::Horizontal => (&mut self.width, &mut self.height),
            PhysicalAxis::Vertical => (&mut self.height, &mut self.width),
        };

        against_auto(inline_size, inline_base);

        match block_base {
            Some(base) => against_auto(block_size, base),
            None => {
                // [§ 10.5](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
                //
                // "If the height of the containing block is not specified
                // explicitly... the value computes to 'auto'."
                if matches!(block_size, AutoLength::Length(l) if l.is_percent()) {
                    *block_size = AutoLength::Auto;
                }
            }
        }
    }

    /// Resolve `box-sizing` into content-box semantics.
    ///
    /// [§ 4.4 box-sizing](https://www.w3.org/TR/css-box-4/#box-sizing)
    ///
    /// "Specified widths and heights... on this element determine the
    /// border box of the element" — so a border-box size shrinks by border
    /// and padding to yield the content size the rest of layout works with.
    /// Afterwards the box-sizing field reads content-box, making the
    /// operation idempotent. Call after [`Style::resolve_percentages`]
    /// (border-box arithmetic needs pixel paddings).
    pub fn resolve_box_sizing(&mut self) {
        if self.box_sizing != BoxSizing::BorderBox {
            return;
        }

        if let AutoLength::Length(l) = self.width {
            let inner = l.to_px_or_zero()
                - self.padding_left.to_px_or_zero()
                - self.padding_right.to_px_or_zero()
                - self.border_left_width.to_px_or_zero()
                - self.border_right_width.to_px_or_zero();
            self.width = AutoLength::px(inner.max(0.0));
        }
        if let AutoLength::Length(l) = self.height {
            let inner = l.to_px_or_zero()
                - self.padding_top.to_px_or_zero()
                - self.padding_bottom.to_px_or_zero()
                - self.border_top_width.to_px_or_zero()
                - self.border_bottom_width.to_px_or_zero();
            self.height = AutoLength::px(inner.max(0.0));
        }

        self.box_sizing = BoxSizing::ContentBox;
    }
}
