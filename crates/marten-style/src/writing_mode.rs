//! CSS writing modes and logical-to-physical mapping.
//!
//! [§ 2 Block Flow Direction](https://www.w3.org/TR/css-writing-modes-4/#block-flow)
//!
//! The mapping functions here are the single source of truth for how
//! logical sides, axes, and sizes land on physical ones. Both the style
//! view and the area geometry lower logical access through these tables at
//! the call site, so there is exactly one place the three writing modes'
//! correspondences live.

use serde::Serialize;

/// [§ 2 Block Flow Direction](https://www.w3.org/TR/css-writing-modes-4/#block-flow)
///
/// "The writing-mode property specifies whether lines of text are laid out
/// horizontally or vertically and the direction in which blocks progress."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum WritingMode {
    /// [§ 2](https://www.w3.org/TR/css-writing-modes-4/#valdef-writing-mode-horizontal-tb)
    ///
    /// "Top-to-bottom block flow direction."
    ///
    /// Mapping:
    ///   - block-start  → top
    ///   - block-end    → bottom
    ///   - inline-start → left  (in ltr)
    ///   - inline-end   → right (in ltr)
    #[default]
    HorizontalTb,

    /// [§ 2](https://www.w3.org/TR/css-writing-modes-4/#valdef-writing-mode-vertical-lr)
    ///
    /// "Left-to-right block flow direction."
    ///
    /// Mapping:
    ///   - block-start  → left
    ///   - block-end    → right
    ///   - inline-start → top    (in ltr)
    ///   - inline-end   → bottom (in ltr)
    VerticalLr,

    /// [§ 2](https://www.w3.org/TR/css-writing-modes-4/#valdef-writing-mode-vertical-rl)
    ///
    /// "Right-to-left block flow direction."
    ///
    /// Mapping:
    ///   - block-start  → right
    ///   - block-end    → left
    ///   - inline-start → top    (in ltr)
    ///   - inline-end   → bottom (in ltr)
    VerticalRl,
}

/// Physical side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalSide {
    /// Top edge of the box.
    Top,
    /// Right edge of the box.
    Right,
    /// Bottom edge of the box.
    Bottom,
    /// Left edge of the box.
    Left,
}

impl PhysicalSide {
    /// The physical axis this side bounds.
    #[must_use]
    pub const fn axis(self) -> PhysicalAxis {
        match self {
            PhysicalSide::Left | PhysicalSide::Right => PhysicalAxis::Horizontal,
            PhysicalSide::Top | PhysicalSide::Bottom => PhysicalAxis::Vertical,
        }
    }

    /// True for the side nearer the coordinate origin (top or left).
    #[must_use]
    pub const fn is_near(self) -> bool {
        matches!(self, PhysicalSide::Top | PhysicalSide::Left)
    }
}

/// Physical axis: the direction a size or position varies along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalAxis {
    /// Left-to-right (x, width).
    Horizontal,
    /// Top-to-bottom (y, height).
    Vertical,
}

/// [§ 6.1 Abstract Dimensions](https://www.w3.org/TR/css-writing-modes-4/#abstract-axes)
///
/// "The block axis is the axis that determines the block flow direction...
/// The inline axis is the axis... along which content is ordered on a line."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalAxis {
    /// The axis blocks stack along.
    Block,
    /// The axis lines run along.
    Inline,
}

/// [§ 6.2 Flow-relative Directions](https://www.w3.org/TR/css-writing-modes-4/#logical-directions)
///
/// The four flow-relative sides of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalSide {
    /// The side from which blocks begin to flow.
    BlockStart,
    /// The side opposite block-start.
    BlockEnd,
    /// The side from which a line begins.
    InlineStart,
    /// The side opposite inline-start.
    InlineEnd,
}

impl WritingMode {
    /// [§ 6.2 Flow-relative Directions](https://www.w3.org/TR/css-writing-modes-4/#logical-directions)
    ///
    /// Map a logical side to the corresponding physical side.
    ///
    /// | Writing Mode   | block-start | block-end | inline-start | inline-end |
    /// |----------------|-------------|-----------|--------------|------------|
    /// | horizontal-tb  | top         | bottom    | left         | right      |
    /// | vertical-lr    | left        | right     | top          | bottom     |
    /// | vertical-rl    | right       | left      | top          | bottom     |
    ///
    /// Inline sides assume `direction: ltr`; the `direction` property is a
    /// cascade concern this engine does not consume yet.
    #[must_use]
    pub const fn physical_side(self, side: LogicalSide) -> PhysicalSide {
        match (self, side) {
            (Self::HorizontalTb, LogicalSide::BlockStart) => PhysicalSide::Top,
            (Self::HorizontalTb, LogicalSide::BlockEnd) => PhysicalSide::Bottom,
            (Self::HorizontalTb, LogicalSide::InlineStart) => PhysicalSide::Left,
            (Self::HorizontalTb, LogicalSide::InlineEnd) => PhysicalSide::Right,

            (Self::VerticalLr, LogicalSide::BlockStart) => PhysicalSide::Left,
            (Self::VerticalLr, LogicalSide::BlockEnd) => PhysicalSide::Right,

            (Self::VerticalRl, LogicalSide::BlockStart) => PhysicalSide::Right,
            (Self::VerticalRl, LogicalSide::BlockEnd) => PhysicalSide::Left,

            (Self::VerticalLr | Self::VerticalRl, LogicalSide::InlineStart) => PhysicalSide::Top,
            (Self::VerticalLr | Self::VerticalRl, LogicalSide::InlineEnd) => PhysicalSide::Bottom,
        }
    }

    /// Map a logical axis to the corresponding physical axis.
    ///
    /// | Writing Mode   | block axis | inline axis |
    /// |----------------|------------|-------------|
    /// | horizontal-tb  | vertical   | horizontal  |
    /// | vertical-lr    | horizontal | vertical    |
    /// | vertical-rl    | horizontal | vertical    |
    #[must_use]
    pub const fn physical_axis(self, axis: LogicalAxis) -> PhysicalAxis {
        match (self, axis) {
            (Self::HorizontalTb, LogicalAxis::Block) => PhysicalAxis::Vertical,
            (Self::HorizontalTb, LogicalAxis::Inline) => PhysicalAxis::Horizontal,
            (Self::VerticalLr | Self::VerticalRl, LogicalAxis::Block) => PhysicalAxis::Horizontal,
            (Self::VerticalLr | Self::VerticalRl, LogicalAxis::Inline) => PhysicalAxis::Vertical,
        }
    }

    /// The physical orientation of this mode's inline axis.
    ///
    /// [§ 3.1 Orthogonal Flows](https://www.w3.org/TR/css-writing-modes-4/#orthogonal-flows)
    ///
    /// "When a box has a writing mode that is perpendicular to its
    /// containing block's writing mode, it is said to be in an orthogonal
    /// flow." Two modes are orthogonal exactly when these differ; an
    /// orthogonal box establishes a new block formatting context.
    #[must_use]
    pub const fn inline_axis(self) -> PhysicalAxis {
        self.physical_axis(LogicalAxis::Inline)
    }

    /// True if `self` and `other` are orthogonal writing modes.
    #[must_use]
    pub fn is_orthogonal_to(self, other: WritingMode) -> bool {
        self.inline_axis() != other.inline_axis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_tb_mapping() {
        let wm = WritingMode::HorizontalTb;
        assert_eq!(wm.physical_side(LogicalSide::BlockStart), PhysicalSide::Top);
        assert_eq!(wm.physical_side(LogicalSide::BlockEnd), PhysicalSide::Bottom);
        assert_eq!(wm.physical_side(LogicalSide::InlineStart), PhysicalSide::Left);
        assert_eq!(wm.physical_side(LogicalSide::InlineEnd), PhysicalSide::Right);
        assert_eq!(wm.physical_axis(LogicalAxis::Block), PhysicalAxis::Vertical);
    }

    #[test]
    fn vertical_rl_block_start_is_right() {
        let wm = WritingMode::VerticalRl;
        assert_eq!(wm.physical_side(LogicalSide::BlockStart), PhysicalSide::Right);
        assert_eq!(wm.physical_side(LogicalSide::BlockEnd), PhysicalSide::Left);
        assert_eq!(wm.physical_side(LogicalSide::InlineStart), PhysicalSide::Top);
        assert_eq!(wm.physical_axis(LogicalAxis::Block), PhysicalAxis::Horizontal);
    }

    #[test]
    fn vertical_lr_block_start_is_left() {
        let wm = WritingMode::VerticalLr;
        assert_eq!(wm.physical_side(LogicalSide::BlockStart), PhysicalSide::Left);
        assert_eq!(wm.physical_side(LogicalSide::InlineEnd), PhysicalSide::Bottom);
    }

    #[test]
    fn orthogonality() {
        assert!(WritingMode::HorizontalTb.is_orthogonal_to(WritingMode::VerticalRl));
        assert!(!WritingMode::VerticalLr.is_orthogonal_to(WritingMode::VerticalRl));
        assert!(!WritingMode::HorizontalTb.is_orthogonal_to(WritingMode::HorizontalTb));
    }
}
