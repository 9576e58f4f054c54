//! Layout failure taxonomy.
//!
//! Every failure here is a programmer or ordering error — a malformed box
//! tree, layout invoked out of order, or a CSS feature this engine
//! deliberately does not implement. None are recoverable: a caller that
//! hits one must treat the document as unlayoutable and must not paint
//! partially resolved geometry.

use thiserror::Error;

use crate::area::AreaId;
use crate::tree::BoxId;

/// A fatal layout error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// A third constraint was set on an area axis that already had two.
    ///
    /// Exactly two of {near edge, far edge, size} may be fixed per axis
    /// (e.g. choose two of left, right, width).
    #[error(
        "cannot set {side} on area {area:?}: this dimension is already \
         locked in (choose two of near edge, far edge, size)"
    )]
    OverConstrained {
        /// The offending area.
        area: AreaId,
        /// The physical side or size being set.
        side: &'static str,
    },

    /// An area was resolved before its parent.
    ///
    /// Resolution is strictly tree-ordered: parents first.
    #[error("cannot resolve area {area:?}: parent is not ready")]
    ParentUnresolved {
        /// The offending area.
        area: AreaId,
    },

    /// An area was resolved twice.
    #[error("area {area:?} is already resolved")]
    AlreadyResolved {
        /// The offending area.
        area: AreaId,
    },

    /// An area was resolved with fewer than four constraints fixed.
    #[error("cannot resolve area {area:?}: geometry is incomplete")]
    Incomplete {
        /// The offending area.
        area: AreaId,
    },

    /// A size was read from an axis that neither a constraint nor the
    /// parent chain can determine.
    #[error("size of area {area:?} is under-determined")]
    UnderDetermined {
        /// The offending area.
        area: AreaId,
    },

    /// A box had no ancestor to serve as its containing block.
    #[error("could not assign a containing block to box {0:?}")]
    NoContainingBlock(BoxId),

    /// A block container's children were neither all block-level nor a
    /// single inline formatting root.
    #[error("box {0:?} mixes block-level and inline-level children")]
    MixedChildren(BoxId),

    /// A deliberately unimplemented CSS feature was required.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// The external shaping/font service failed; the whole preprocessing
    /// phase of the affected inline formatting context is aborted.
    #[error("text shaping failed: {0}")]
    Shape(#[from] ShapeErrorKind),
}

/// A copyable projection of [`marten_text::ShapeError`].
///
/// The service error carries allocation-heavy context; layout errors stay
/// `Copy` so they can be matched and reported cheaply, so only the kind
/// crosses the boundary (the service logs the detail).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeErrorKind {
    /// Font/extents lookup failed.
    #[error("font lookup failed")]
    FontLookup,
    /// Shaping produced no usable items.
    #[error("shaping failed")]
    Shaping,
}

impl From<marten_text::ShapeError> for LayoutError {
    fn from(err: marten_text::ShapeError) -> Self {
        log::debug!("shaping service error: {err}");
        match err {
            marten_text::ShapeError::FontLookup(_) => {
                LayoutError::Shape(ShapeErrorKind::FontLookup)
            }
            marten_text::ShapeError::Shaping(_) => LayoutError::Shape(ShapeErrorKind::Shaping),
        }
    }
}
