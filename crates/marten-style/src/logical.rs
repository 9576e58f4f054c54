//! Flow-relative (logical) view over a physical computed style.
//!
//! [§ 6 Abstract Box Terminology](https://www.w3.org/TR/css-writing-modes-4/#abstract-box)
//!
//! "CSS2.1 defines the box model in physical terms. This module defines
//! the mapping between physical and flow-relative directions."
//!
//! The view borrows the style immutably and lowers every accessor through
//! [`WritingMode::physical_side`] / [`WritingMode::physical_axis`] at the
//! call site; it owns no state of its own beyond the writing mode it was
//! keyed with. Layout always reads box properties through this view in the
//! writing mode of the block formatting context the box participates in.

use crate::values::{AutoLength, LengthValue};
use crate::writing_mode::{LogicalAxis, LogicalSide, PhysicalAxis, PhysicalSide, WritingMode};
use crate::Style;

/// A read-only logical view of a [`Style`], keyed by a writing mode.
///
/// Obtained from [`Style::logical`].
#[derive(Debug, Clone, Copy)]
pub struct LogicalStyle<'a> {
    style: &'a Style,
    writing_mode: WritingMode,
}

impl<'a> LogicalStyle<'a> {
    pub(crate) fn new(style: &'a Style, writing_mode: WritingMode) -> Self {
        LogicalStyle {
            style,
            writing_mode,
        }
    }

    /// The writing mode this view is keyed by.
    #[must_use]
    pub fn writing_mode(&self) -> WritingMode {
        self.writing_mode
    }

    fn margin_physical(&self, side: PhysicalSide) -> AutoLength {
        match side {
            PhysicalSide::Top => self.style.margin_top,
            PhysicalSide::Right => self.style.margin_right,
            PhysicalSide::Bottom => self.style.margin_bottom,
            PhysicalSide::Left => self.style.margin_left,
        }
    }

    fn padding_physical(&self, side: PhysicalSide) -> LengthValue {
        match side {
            PhysicalSide::Top => self.style.padding_top,
            PhysicalSide::Right => self.style.padding_right,
            PhysicalSide::Bottom => self.style.padding_bottom,
            PhysicalSide::Left => self.style.padding_left,
        }
    }

    fn border_physical(&self, side: PhysicalSide) -> LengthValue {
        match side {
            PhysicalSide::Top => self.style.border_top_width,
            PhysicalSide::Right => self.style.border_right_width,
            PhysicalSide::Bottom => self.style.border_bottom_width,
            PhysicalSide::Left => self.style.border_left_width,
        }
    }

    fn size_physical(&self, axis: PhysicalAxis) -> AutoLength {
        match axis {
            PhysicalAxis::Horizontal => self.style.width,
            PhysicalAxis::Vertical => self.style.height,
        }
    }

    /// The margin on a flow-relative side.
    #[must_use]
    pub fn margin(&self, side: LogicalSide) -> AutoLength {
        self.margin_physical(self.writing_mode.physical_side(side))
    }

    /// The used padding on a flow-relative side, in pixels.
    #[must_use]
    pub fn padding(&self, side: LogicalSide) -> f32 {
        self.padding_physical(self.writing_mode.physical_side(side))
            .to_px_or_zero()
    }

    /// The used border width on a flow-relative side, in pixels.
    #[must_use]
    pub fn border_width(&self, side: LogicalSide) -> f32 {
        self.border_physical(self.writing_mode.physical_side(side))
            .to_px_or_zero()
    }

    /// The size along a flow-relative axis.
    #[must_use]
    pub fn size(&self, axis: LogicalAxis) -> AutoLength {
        self.size_physical(self.writing_mode.physical_axis(axis))
    }

    /// The inline-axis size (`width` in horizontal writing modes).
    #[must_use]
    pub fn inline_size(&self) -> AutoLength {
        self.size(LogicalAxis::Inline)
    }

    /// The block-axis size (`height` in horizontal writing modes).
    #[must_use]
    pub fn block_size(&self) -> AutoLength {
        self.size(LogicalAxis::Block)
    }

    /// The block-start margin, with `auto` taking its used value of 0.
    ///
    /// [§ 10.6.3](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    ///
    /// "If 'margin-top', or 'margin-bottom' are 'auto', their used value
    /// is 0."
    #[must_use]
    pub fn used_margin_block_start(&self) -> f32 {
        self.margin(LogicalSide::BlockStart).to_px_or(0.0)
    }

    /// The block-end margin, with `auto` taking its used value of 0.
    #[must_use]
    pub fn used_margin_block_end(&self) -> f32 {
        self.margin(LogicalSide::BlockEnd).to_px_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_view_follows_writing_mode() {
        let mut style = Style::default();
        style.margin_top = AutoLength::px(1.0);
        style.margin_right = AutoLength::px(2.0);
        style.margin_bottom = AutoLength::px(3.0);
        style.margin_left = AutoLength::px(4.0);
        style.width = AutoLength::px(100.0);
        style.height = AutoLength::px(50.0);

        let h = style.logical(WritingMode::HorizontalTb);
        assert_eq!(h.margin(LogicalSide::BlockStart), AutoLength::px(1.0));
        assert_eq!(h.margin(LogicalSide::InlineEnd), AutoLength::px(2.0));
        assert_eq!(h.inline_size(), AutoLength::px(100.0));
        assert_eq!(h.block_size(), AutoLength::px(50.0));

        let vrl = style.logical(WritingMode::VerticalRl);
        assert_eq!(vrl.margin(LogicalSide::BlockStart), AutoLength::px(2.0));
        assert_eq!(vrl.margin(LogicalSide::BlockEnd), AutoLength::px(4.0));
        assert_eq!(vrl.margin(LogicalSide::InlineStart), AutoLength::px(1.0));
        assert_eq!(vrl.inline_size(), AutoLength::px(50.0));
        assert_eq!(vrl.block_size(), AutoLength::px(100.0));
    }
}
