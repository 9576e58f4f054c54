//! Text subsystem boundary for the marten layout engine.
//!
//! # Scope
//!
//! Layout does not shape text, match fonts, or discover break
//! opportunities; it consumes those as services. This crate holds the
//! boundary:
//!
//! - [`TextRun`] — the leaf payload text nodes become in the box tree.
//! - [`collapse`] — white-space collapsing over an inline formatting
//!   context's concatenated buffer
//!   ([CSS Text Module Level 3 § 4.1](https://www.w3.org/TR/css-text-3/#white-space-rules)).
//! - [`shape`] — the [`TextShaper`] service trait (font extents, shaped
//!   items, line boxes) and the deterministic [`MetricShaper`]
//!   implementation used by default and in tests.

pub mod collapse;
pub mod shape;

pub use collapse::{collapse, is_all_collapsible_ws, Collapsed, Segment};
pub use shape::{
    FontExtents, Linebox, MetricShaper, ShapeError, ShapeRun, ShapedItem, TextShaper, TextStyle,
};

/// A run of text: the leaf content of an inline formatting context.
///
/// [§ 2.5 Text Runs](https://www.w3.org/TR/css-display-3/#text-nodes)
///
/// "A text run is the most basic inline-level content, consisting of a
/// contiguous sequence of text."
///
/// `start`/`end` locate the run's contribution inside its inline
/// formatting context's *collapsed* buffer (exclusive end); they are
/// assigned during IFC preparation, after white-space collapsing. A run
/// whose range is empty collapsed away entirely and is pruned from the box
/// tree.
#[derive(Debug, Clone)]
pub struct TextRun {
    /// The run's original (uncollapsed) text.
    pub text: String,
    /// Byte offset of the run's content in the collapsed buffer.
    pub start: usize,
    /// Exclusive byte offset of the run's content in the collapsed buffer.
    pub end: usize,
    /// Whether white space collapses in this run (`white-space: normal`).
    pub collapsible: bool,
}

impl TextRun {
    /// A new run with an unassigned range.
    #[must_use]
    pub fn new(text: String, collapsible: bool) -> Self {
        TextRun {
            text,
            start: 0,
            end: 0,
            collapsible,
        }
    }

    /// True if the run's collapsed contribution is empty.
    #[must_use]
    pub fn is_collapsed_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if the run consists entirely of collapsible white space.
    ///
    /// [§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// Such runs never justify an anonymous block box on their own.
    #[must_use]
    pub fn is_all_collapsible_ws(&self) -> bool {
        self.collapsible && is_all_collapsible_ws(&self.text)
    }
}
