//! Margin collapsing.
//!
//! [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
//!
//! "Adjoining vertical margins collapse... Two margins are adjoining if
//! and only if... both belong to in-flow block-level boxes that
//! participate in the same block formatting context; no line boxes, no
//! clearance, no padding and no border separate them."
//!
//! The engine runs over the linear pre/post traversal of one block
//! formatting context's participating boxes, recorded by the orchestrator.
//! Margins accumulate into *collections*; each finished collection
//! collapses to a single value attributed to the collection's root box,
//! and the positioning pass applies that value at the root's block start
//! or end.

use std::collections::HashMap;

use marten_style::{AutoLength, LogicalSide, WritingMode};

use crate::tree::{BoxId, BoxTree};

/// Whether a traversal event is the opening or closing visit of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Start,
    End,
}

/// A set of margins that collapse together.
#[derive(Debug)]
struct Collection {
    /// The box the collapsed margin is attributed to. For an end-adjoining
    /// run this is promoted to the outermost box so that the siblings that
    /// must shift stay anchored to it.
    root: BoxId,
    /// Whether the collapsed value applies at the root's block start or
    /// block end.
    position: Tag,
    /// The raw adjoining margin values.
    margins: Vec<f32>,
    /// [§ 8.3.1](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
    ///
    /// "If the top and bottom margins of a box are adjoining, then it is
    /// possible for margins to collapse through it."
    through: bool,
}

/// The two id → collapsed-margin mappings produced for one block
/// formatting context.
#[derive(Debug, Default)]
pub struct MarginMaps {
    /// Collapsed margin applied before a box's block-start edge.
    pub start: HashMap<BoxId, f32>,
    /// Collapsed margin applied after a box's block-end edge.
    pub end: HashMap<BoxId, f32>,
}

/// [§ 8.3.1](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
///
/// "When two or more margins collapse, the resulting margin width is the
/// maximum of the collapsing margins' widths. In the case of negative
/// margins, the maximum of the absolute values of the negative adjoining
/// margins is deducted from the maximum of the positive adjoining margins.
/// If there are no positive margins, the maximum of the absolute values of
/// the adjoining margins is deducted from zero."
#[must_use]
pub fn collapsed_value(margins: &[f32]) -> f32 {
    let mut positive = 0.0_f32;
    let mut negative = 0.0_f32;
    for &m in margins {
        if m < 0.0 {
            negative = negative.max(-m);
        } else {
            positive = positive.max(m);
        }
    }
    positive - negative
}

/// Transient per-BFC margin-collapsing state machine.
///
/// Driven with one [`MarginCollapseContext::box_start`] /
/// [`MarginCollapseContext::box_end`] pair per participating box, in
/// pre/post traversal order; consumed by
/// [`MarginCollapseContext::into_margin_maps`].
#[derive(Debug, Default)]
pub struct MarginCollapseContext {
    /// Index of the collection still open for adjoining margins.
    current: Option<usize>,
    /// The tag of the previously processed traversal event.
    last: Option<Tag>,
    collections: Vec<Collection>,
}

impl MarginCollapseContext {
    /// Fresh state for one block formatting context.
    #[must_use]
    pub fn new() -> Self {
        MarginCollapseContext::default()
    }

    /// Record the opening visit of a block-level box.
    ///
    /// The box's block-start margin joins the open collection, or opens a
    /// new start-position collection rooted at this box. Non-zero
    /// block-start padding or border breaks adjoinment for everything
    /// deeper, so the collection is closed immediately in that case.
    pub fn box_start(&mut self, tree: &BoxTree, id: BoxId, writing_mode: WritingMode) {
        let style = tree.node(id).style.logical(writing_mode);
        let adjoins = style.padding(LogicalSide::BlockStart) == 0.0
            && style.border_width(LogicalSide::BlockStart) == 0.0;
        let margin = style.used_margin_block_start();

        match self.current {
            Some(i) => self.collections[i].margins.push(margin),
            None => {
                self.collections.push(Collection {
                    root: id,
                    position: Tag::Start,
                    margins: vec![margin],
                    through: false,
                });
                self.current = Some(self.collections.len() - 1);
            }
        }

        if !adjoins {
            self.current = None;
        }

        self.last = Some(Tag::Start);
    }

    /// Record the closing visit of a block-level box.
    ///
    /// The block-end margin may adjoin the open collection only when end
    /// padding and border are zero and, per § 8.3.1, either the box is
    /// empty with auto-or-zero block size and no formatting context of its
    /// own (margins collapse *through* it), or the box closed at the end
    /// of its parent with auto block size.
    pub fn box_end(&mut self, tree: &BoxTree, id: BoxId, writing_mode: WritingMode) {
        let style = tree.node(id).style.logical(writing_mode);
        let mut adjoins = style.padding(LogicalSide::BlockEnd) == 0.0
            && style.border_width(LogicalSide::BlockEnd) == 0.0;
        let margin = style.used_margin_block_end();

        if self.current.is_some() && adjoins {
            if self.last == Some(Tag::Start) {
                // The end of a block box that had no block children.
                // TODO: min-height should also be checked once the engine
                // consumes it, per the § 8.3.1 self-collapse conditions.
                let size_ok = match style.block_size() {
                    AutoLength::Auto => true,
                    size => size.to_px_or(0.0) == 0.0,
                };
                adjoins =
                    tree.children(id).is_empty() && !tree.node(id).is_bfc_root() && size_ok;
            } else {
                // The end of a block box that was the last in its parent.
                adjoins = style.block_size().is_auto();
            }
        }

        match (self.current, adjoins) {
            (Some(i), true) => {
                if self.last == Some(Tag::Start) {
                    self.collections[i].through = true;
                }
                self.collections[i].margins.push(margin);
                // When a box's end adjoins the previous margin, move the
                // root (the box the margin will be placed adjacent to) to
                // the highest-up box in the tree, since its siblings need
                // to shift. Not when collapsing through: § 8.3.1's last two
                // bullets keep a collapsed-through box's position as if its
                // margin were at its own top.
                if self.last == Some(Tag::End) && !self.collections[i].through {
                    self.collections[i].root = id;
                }
            }
            _ => {
                self.collections.push(Collection {
                    root: id,
                    position: Tag::End,
                    margins: vec![margin],
                    through: false,
                });
                self.current = Some(self.collections.len() - 1);
            }
        }

        self.last = Some(Tag::End);
    }

    /// Collapse every finished collection and key the results by its root.
    #[must_use]
    pub fn into_margin_maps(self) -> MarginMaps {
        let mut maps = MarginMaps::default();
        for collection in self.collections {
            let value = collapsed_value(&collection.margins);
            match collection.position {
                Tag::Start => {
                    maps.start.insert(collection.root, value);
                }
                Tag::End => {
                    maps.end.insert(collection.root, value);
                }
            }
        }
        maps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_margins_take_the_maximum() {
        assert_eq!(collapsed_value(&[5.0, 10.0, 3.0]), 10.0);
    }

    #[test]
    fn negative_margins_deduct_their_maximum_magnitude() {
        assert_eq!(collapsed_value(&[10.0, -4.0, -6.0]), 4.0);
        assert_eq!(collapsed_value(&[-4.0, -6.0]), -6.0);
    }

    #[test]
    fn grouping_independence() {
        // max(0, max(m_i)) − max(0, max(−m_i)) regardless of order.
        let a = collapsed_value(&[3.0, -2.0, 7.0, -5.0]);
        let b = collapsed_value(&[-5.0, 7.0, -2.0, 3.0]);
        assert_eq!(a, b);
        assert_eq!(a, 2.0);
    }
}
