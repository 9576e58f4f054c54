//! Computed value types consumed by layout.
//!
//! [§ 6 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//!
//! "The computed value is the result of resolving the specified value...
//! as far as possible without laying out the document."
//!
//! Percentages cannot be resolved without a containing block, so they
//! survive into these types and are turned into pixels by
//! [`crate::Style::resolve_percentages`] once layout knows the containing
//! block's dimensions.

use serde::Serialize;

/// A computed length: either absolute pixels or a percentage awaiting a
/// containing block.
///
/// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
///
/// "A percentage value is always relative to another quantity, for example
/// a length."
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LengthValue {
    /// An absolute length in CSS pixels.
    Px(f32),
    /// A percentage of some containing-block dimension; `50%` is `0.5`.
    Percent(f32),
}

impl LengthValue {
    /// Zero pixels.
    pub const ZERO: LengthValue = LengthValue::Px(0.0);

    /// Resolve this length against a base, producing pixels.
    #[must_use]
    pub fn resolve(self, base: f32) -> f32 {
        match self {
            LengthValue::Px(px) => px,
            LengthValue::Percent(p) => p * base,
        }
    }

    /// The pixel value, treating an unresolved percentage as 0.
    ///
    /// Layout resolves percentages before reading used values; a percentage
    /// surviving to this point means the caller skipped
    /// [`crate::Style::resolve_percentages`], and 0 is the least-harm
    /// fallback.
    #[must_use]
    pub fn to_px_or_zero(self) -> f32 {
        match self {
            LengthValue::Px(px) => px,
            LengthValue::Percent(_) => 0.0,
        }
    }

    /// True if this is a percentage still awaiting resolution.
    #[must_use]
    pub fn is_percent(self) -> bool {
        matches!(self, LengthValue::Percent(_))
    }
}

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "Some properties can take the keyword 'auto' as a value. This keyword
/// allows the user agent to compute the value based on other properties."
///
/// Used for margins and for width/height, where `auto` has algorithmic
/// meaning (centering, fill-available, content-based sizing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub enum AutoLength {
    /// The value is `auto` and is resolved during layout.
    #[default]
    Auto,
    /// A specific computed length.
    Length(LengthValue),
}

impl AutoLength {
    /// A zero-pixel length (not `auto`).
    pub const ZERO: AutoLength = AutoLength::Length(LengthValue::ZERO);

    /// Shorthand for an absolute pixel value.
    #[must_use]
    pub fn px(v: f32) -> Self {
        AutoLength::Length(LengthValue::Px(v))
    }

    /// True if the value is `auto`.
    #[must_use]
    pub fn is_auto(self) -> bool {
        matches!(self, AutoLength::Auto)
    }

    /// The pixel value, or `default` if `auto` (percentages count as 0, see
    /// [`LengthValue::to_px_or_zero`]).
    #[must_use]
    pub fn to_px_or(self, default: f32) -> f32 {
        match self {
            AutoLength::Auto => default,
            AutoLength::Length(l) => l.to_px_or_zero(),
        }
    }
}

/// [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// "The display property defines an element's display type, which consists
/// of the two basic qualities of how an element generates boxes: the outer
/// display type... and the inner display type."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Display {
    /// How the box participates in its parent's formatting context.
    pub outer: OuterDisplay,
    /// What formatting context the box's contents are laid out in.
    pub inner: InnerDisplay,
}

impl Display {
    /// `display: block` (block outer, flow inner).
    #[must_use]
    pub const fn block() -> Self {
        Display {
            outer: OuterDisplay::Block,
            inner: InnerDisplay::Flow,
        }
    }

    /// `display: inline` (inline outer, flow inner).
    #[must_use]
    pub const fn inline() -> Self {
        Display {
            outer: OuterDisplay::Inline,
            inner: InnerDisplay::Flow,
        }
    }

    /// `display: flow-root` (block outer, flow-root inner).
    #[must_use]
    pub const fn flow_root() -> Self {
        Display {
            outer: OuterDisplay::Block,
            inner: InnerDisplay::FlowRoot,
        }
    }
}

impl Default for Display {
    fn default() -> Self {
        Display::block()
    }
}

/// [§ 2.1 Outer Display Roles](https://www.w3.org/TR/css-display-3/#outer-role)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OuterDisplay {
    /// "The element generates a box that is block-level."
    Block,
    /// "The element generates a box that is inline-level."
    Inline,
}

/// [§ 2.2 Inner Display Layout Models](https://www.w3.org/TR/css-display-3/#inner-model)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InnerDisplay {
    /// "The element lays out its contents using flow layout."
    Flow,
    /// "The element... establishes a new block formatting context."
    FlowRoot,
}

/// [§ 9.3.1 Choosing a positioning scheme](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
///
/// Only the three schemes layout supports exist here; anything else is
/// rejected upstream by whatever produces the computed style, so an
/// unsupported `position` is unrepresentable rather than a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Position {
    /// "The box is a normal box, laid out according to the normal flow."
    #[default]
    Static,
    /// "The box's position is calculated according to the normal flow...
    /// Then the box may be offset relative to its normal position."
    Relative,
    /// "The box's position... is specified with respect to its containing
    /// block."
    Absolute,
}

/// [§ 4.4 box-sizing](https://www.w3.org/TR/css-box-4/#box-sizing)
///
/// "The box-sizing property defines whether the width and height... include
/// padding and borders or not."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum BoxSizing {
    /// Width/height set the content box.
    #[default]
    ContentBox,
    /// Width/height set the border box.
    BorderBox,
}

/// [§ 3 White Space Processing](https://www.w3.org/TR/css-text-3/#white-space-property)
///
/// Only collapsing behavior matters to this engine; the full property also
/// controls wrapping, which the line breaker owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum WhiteSpace {
    /// "This value directs user agents to collapse sequences of white space."
    #[default]
    Normal,
    /// "This value prevents user agents from collapsing sequences of white
    /// space."
    Pre,
}

impl WhiteSpace {
    /// True if white space collapses under this value.
    #[must_use]
    pub fn collapses(self) -> bool {
        matches!(self, WhiteSpace::Normal)
    }
}

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "The initial value of 'line-height' is 'normal'. We recommend a used
/// value... between 1.0 and 1.2."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub enum LineHeight {
    /// Derive the line height from the font's own metrics.
    #[default]
    Normal,
    /// An explicit used line height in pixels.
    Px(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_resolution() {
        assert_eq!(LengthValue::Percent(0.25).resolve(200.0), 50.0);
        assert_eq!(LengthValue::Px(7.0).resolve(200.0), 7.0);
    }

    #[test]
    fn auto_length_defaults() {
        assert!(AutoLength::Auto.is_auto());
        assert_eq!(AutoLength::Auto.to_px_or(3.0), 3.0);
        assert_eq!(AutoLength::px(5.0).to_px_or(3.0), 5.0);
    }
}
