//! Block flow layout: box models, BFC positioning, and the orchestrator.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block. The vertical
//! distance between two sibling boxes is determined by the 'margin'
//! properties. Vertical margins between adjacent block-level boxes in a
//! block formatting context collapse."
//!
//! All block-axis arithmetic here is writing-mode-relative: positions and
//! sizes are set through logical sides and axes, lowered onto physical
//! area fields by the mapping tables. The orchestrator threads a
//! [`LayoutContext`] carrying the enclosing BFC's writing mode and the
//! containing-block state through the recursion, and records the flat
//! pre/post traversal that margin collapsing and positioning both consume.

use marten_style::{AutoLength, LogicalAxis, LogicalSide, WritingMode};
use marten_text::TextShaper;

use crate::area::AreaId;
use crate::error::LayoutError;
use crate::inline;
use crate::margin::MarginCollapseContext;
use crate::tree::{BoxId, BoxKind, BoxTree};

/// Per-call layout state threaded through the recursion.
///
/// [§ 10.1 Definition of containing block](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
///
/// Carries the writing mode of the block formatting context currently
/// being laid out and the two candidate containing-block areas: the
/// content area of the nearest block container and the padding area of the
/// nearest positioned box.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext {
    /// The writing mode of the enclosing block formatting context.
    pub writing_mode: WritingMode,
    /// Content area of the nearest ancestor block container.
    pub last_block_container_area: AreaId,
    /// Padding area of the nearest ancestor positioned box.
    pub last_positioned_area: AreaId,
}

/// One entry of a BFC's flat pre/post traversal record.
///
/// Margin collapsing and box positioning walk the same record, so both see
/// the same linearization of the BFC's participating boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BfcEvent {
    /// Opening visit of a block-level box.
    Pre(BoxId),
    /// Closing visit of a block-level box.
    Post(BoxId),
}

/// Assign this box's containing block per CSS2.2 § 10.1 and update the
/// propagated references for its descendants.
///
/// "If the element's position is 'relative' or 'static', the containing
/// block is formed by the content edge of the nearest ancestor box that is
/// a block container... If the element has 'position: absolute', the
/// containing block is established by the nearest ancestor with a
/// 'position' of 'absolute', 'relative' or 'fixed'... in the case that the
/// ancestor is block-level, the containing block is formed by the padding
/// edge of the ancestor."
///
/// The box's border area is re-parented onto the assigned containing block
/// so that later resolution happens against it.
pub fn assign_containing_block(tree: &mut BoxTree, id: BoxId, ctx: &mut LayoutContext) {
    let node = tree.node(id);
    let cb = if node.is_absolute() {
        ctx.last_positioned_area
    } else {
        // Relative, static, and anonymous boxes, which carry no position
        // of their own.
        ctx.last_block_container_area
    };
    let border_area = node.border_area;
    let content_area = node.content_area;
    let padding_area = node.padding_area;
    let is_block_container = matches!(node.kind, BoxKind::Block(_));
    let is_positioned = node.is_positioned();

    tree.node_mut(id).containing_block = Some(cb);
    tree.areas.set_parent(border_area, cb);

    if is_block_container {
        ctx.last_block_container_area = content_area;
    }
    if is_positioned {
        ctx.last_positioned_area = padding_area;
    }
}

/// Assign containing blocks throughout an inline subtree (the inline
/// formatting root and every descendant that is not a text run — runs
/// never get a containing block of their own).
pub fn assign_inline_containing_blocks(tree: &mut BoxTree, id: BoxId, ctx: LayoutContext) {
    let mut child_ctx = ctx;
    assign_containing_block(tree, id, &mut child_ctx);
    let children = tree.children(id).to_vec();
    for child in children {
        if !matches!(tree.node(child).kind, BoxKind::Run(_)) {
            assign_inline_containing_blocks(tree, child, child_ctx);
        }
    }
}

/// Inline-axis box model for a block-level box, CSS2.2
/// [§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth).
///
/// "'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
/// 'padding-right' + 'border-right-width' + 'margin-right' = width of
/// containing block"
///
/// Rather than storing used values, this fixes the inline-axis edges of
/// the box's three areas such that the constraint holds: the border area
/// sits `margin` inside the containing block on each side, and the
/// specified or derived size emerges from the edge arithmetic.
fn inline_box_model(tree: &mut BoxTree, id: BoxId, ctx: &LayoutContext) -> Result<(), LayoutError> {
    let node = tree.node(id);
    let cb = node
        .containing_block
        .ok_or(LayoutError::NoContainingBlock(id))?;
    let writing_mode = ctx.writing_mode;
    let style = node.style.logical(writing_mode);

    let inline_axis = writing_mode.physical_axis(LogicalAxis::Inline);
    let cb_inline_size = tree
        .areas
        .size_if_determined(cb, inline_axis)
        .ok_or(LayoutError::Unsupported(
            "auto inline size for orthogonal writing modes",
        ))?;

    let border_start = style.border_width(LogicalSide::InlineStart);
    let border_end = style.border_width(LogicalSide::InlineEnd);
    let padding_start = style.padding(LogicalSide::InlineStart);
    let padding_end = style.padding(LogicalSide::InlineEnd);
    let mut margin_start = style.margin(LogicalSide::InlineStart);
    let mut margin_end = style.margin(LogicalSide::InlineEnd);

    match style.inline_size() {
        AutoLength::Length(size) => {
            let size = size.to_px_or_zero();
            let specified = size
                + border_start
                + padding_start
                + padding_end
                + border_end
                + margin_start.to_px_or(0.0)
                + margin_end.to_px_or(0.0);

            // Paragraph 2: "If 'width' is not 'auto' and [the sum] is
            // larger than the width of the containing block, then any
            // 'auto' values for 'margin-left' or 'margin-right' are, for
            // the following rules, treated as zero."
            if specified > cb_inline_size {
                if margin_start.is_auto() {
                    margin_start = AutoLength::ZERO;
                }
                if margin_end.is_auto() {
                    margin_end = AutoLength::ZERO;
                }
            }

            match (margin_start, margin_end) {
                (AutoLength::Length(start), AutoLength::Length(_)) => {
                    // Paragraph 3: over-constrained. The end margin absorbs
                    // the slack (ltr), going negative on overflow.
                    let start = start.to_px_or_zero();
                    margin_start = AutoLength::px(start);
                    margin_end = AutoLength::px(
                        cb_inline_size - size - border_start - border_end - padding_start
                            - padding_end
                            - start,
                    );
                }
                (AutoLength::Auto, AutoLength::Length(end)) => {
                    // Paragraph 4: the single auto margin absorbs the slack.
                    let end = end.to_px_or_zero();
                    margin_start = AutoLength::px(
                        cb_inline_size - size - border_start - border_end - padding_start
                            - padding_end
                            - end,
                    );
                    margin_end = AutoLength::px(end);
                }
                (AutoLength::Length(start), AutoLength::Auto) => {
                    let start = start.to_px_or_zero();
                    margin_end = AutoLength::px(
                        cb_inline_size - size - border_start - border_end - padding_start
                            - padding_end
                            - start,
                    );
                    margin_start = AutoLength::px(start);
                }
                (AutoLength::Auto, AutoLength::Auto) => {
                    // Paragraph 6: "their used values are equal. This
                    // horizontally centers the element."
                    let slack = (cb_inline_size
                        - size
                        - border_start
                        - border_end
                        - padding_start
                        - padding_end)
                        / 2.0;
                    margin_start = AutoLength::px(slack);
                    margin_end = AutoLength::px(slack);
                }
            }
        }
        AutoLength::Auto => {
            // Paragraph 5: "If 'width' is set to 'auto', any other 'auto'
            // values become '0' and 'width' follows from the resulting
            // equality." The width itself is left implied: the content
            // area's inline size derives from the containing block minus
            // the fixed edges.
            if margin_start.is_auto() {
                margin_start = AutoLength::ZERO;
            }
            if margin_end.is_auto() {
                margin_end = AutoLength::ZERO;
            }
        }
    }

    let start_side = writing_mode.physical_side(LogicalSide::InlineStart);
    let end_side = writing_mode.physical_side(LogicalSide::InlineEnd);
    let node = tree.node(id);
    let (border_area, padding_area, content_area) =
        (node.border_area, node.padding_area, node.content_area);

    tree.areas
        .set_edge(border_area, start_side, margin_start.to_px_or(0.0))?;
    tree.areas
        .set_edge(border_area, end_side, margin_end.to_px_or(0.0))?;
    tree.areas.set_edge(padding_area, start_side, border_start)?;
    tree.areas.set_edge(padding_area, end_side, border_end)?;
    tree.areas.set_edge(content_area, start_side, padding_start)?;
    tree.areas.set_edge(content_area, end_side, padding_end)?;
    Ok(())
}

/// Block-axis box model for a block-level box, CSS2.2
/// [§ 10.6.3](https://www.w3.org/TR/CSS2/visudet.html#normal-block).
///
/// An explicit block size applies immediately; an auto block size on an
/// empty box is zero; an auto block size over block-level children is
/// filled in later by [`position_boxes`], and over inline content by text
/// layout ([`inline::do_text_layout`]) — a caller that routes an
/// of-inlines box elsewhere surfaces an under-determined block size
/// downstream rather than a silent approximation.
fn block_box_model(tree: &mut BoxTree, id: BoxId, ctx: &LayoutContext) -> Result<(), LayoutError> {
    let writing_mode = ctx.writing_mode;
    let style = tree.node(id).style.logical(writing_mode);

    match style.block_size() {
        AutoLength::Auto => {
            if tree.children(id).is_empty() {
                tree.set_block_size(id, 0.0, writing_mode)?;
            }
            // Otherwise: accumulated by BFC positioning or text layout,
            // where margin calculation lives (§ 10.6.3's cases re-phrase
            // the margin-collapsing rules of § 8.3.1).
        }
        size => {
            tree.set_block_size(id, size.to_px_or(0.0), writing_mode)?;
        }
    }
    Ok(())
}

/// Assign block-axis offsets (and remaining auto block sizes) to every box
/// of one BFC from its traversal record and collapsed margins.
///
/// [§ 8.3.1](https://www.w3.org/TR/CSS2/box.html#collapsing-margins) for
/// the collapsing pass; the offsets then follow § 9.4.1's stacking rule
/// with each box's collapsed start margin applied before it and collapsed
/// end margin after it.
pub fn position_boxes(
    tree: &mut BoxTree,
    bfc_root: BoxId,
    ctx: &LayoutContext,
    events: &[BfcEvent],
) -> Result<(), LayoutError> {
    let writing_mode = ctx.writing_mode;

    // Collapse margins first, over the same linearization.
    let mut mctx = MarginCollapseContext::new();
    for event in events {
        match *event {
            BfcEvent::Pre(id) => mctx.box_start(tree, id, writing_mode),
            BfcEvent::Post(id) => mctx.box_end(tree, id, writing_mode),
        }
    }
    let margins = mctx.into_margin_maps();

    let block_axis = writing_mode.physical_axis(LogicalAxis::Block);
    let mut saved: Vec<f32> = Vec::new();
    let mut block_offset = 0.0_f32;

    for event in events {
        match *event {
            BfcEvent::Pre(id) => {
                block_offset += margins.start.get(&id).copied().unwrap_or(0.0);
                saved.push(block_offset);
                tree.set_block_position(id, block_offset, writing_mode)?;
                block_offset = 0.0;
            }
            BfcEvent::Post(id) => {
                // Auto block sizes accumulate from children here — but only
                // for containers of blocks: a container of inlines got its
                // size from text layout, and a nested BFC root from its own
                // positioning pass.
                let style = tree.node(id).style.logical(writing_mode);
                if style.block_size().is_auto()
                    && !tree.node(id).is_bfc_root()
                    && tree.sole_ifc_child(id).is_none()
                {
                    tree.set_block_size(id, block_offset, writing_mode)?;
                }

                // The border-box block size must be determined by now: it
                // was either set explicitly, accumulated above, or filled
                // in by a nested BFC / text layout. Anything else is a
                // tree-shape bug surfaced as an error.
                let border_size = tree
                    .areas
                    .size(tree.node(id).border_area, block_axis)?;

                block_offset = saved.pop().unwrap_or(0.0) + border_size;
                block_offset += margins.end.get(&id).copied().unwrap_or(0.0);
            }
        }
    }

    // The BFC root's own auto block size, when nothing else determined it,
    // is the final accumulated offset.
    let content_area = tree.node(bfc_root).content_area;
    if tree
        .areas
        .size_if_determined(content_area, block_axis)
        .is_none()
    {
        tree.set_block_size(bfc_root, block_offset, writing_mode)?;
    }
    Ok(())
}

/// Recursive layout of one block-level box.
///
/// The sequence per box: record the pre event; assign containing blocks;
/// resolve style percentages and box-sizing against the now-known
/// containing block; apply the inline then block box models; switch
/// writing mode and open a fresh traversal record when the box roots a new
/// BFC; lay out inline content or recurse into block children; run margin
/// collapsing and positioning over a completed BFC; record the post event.
///
/// # Errors
///
/// Tree-shape violations, geometry misuse, and unsupported features are
/// all fatal; see [`LayoutError`].
pub fn layout_block_box(
    tree: &mut BoxTree,
    id: BoxId,
    ctx: &LayoutContext,
    events: &mut Vec<BfcEvent>,
    shaper: &dyn TextShaper,
) -> Result<(), LayoutError> {
    log::trace!("layout box {:?}", id);
    events.push(BfcEvent::Pre(id));

    let mut child_ctx = *ctx;
    assign_containing_block(tree, id, &mut child_ctx);

    if !tree.node(id).is_block_level_container() {
        return Err(LayoutError::Unsupported(
            "inline-level layout requested directly",
        ));
    }

    // Percentages and box-sizing resolve against the containing block
    // before any used value is read.
    let cb = tree.node(id).containing_block.ok_or(LayoutError::NoContainingBlock(id))?;
    let inline_base = tree
        .areas
        .size_if_determined(cb, ctx.writing_mode.physical_axis(LogicalAxis::Inline))
        .unwrap_or(0.0);
    let block_base = tree
        .areas
        .size_if_determined(cb, ctx.writing_mode.physical_axis(LogicalAxis::Block));
    let style = &mut tree.node_mut(id).style;
    style.resolve_percentages(ctx.writing_mode, inline_base, block_base);
    style.resolve_box_sizing();

    let of_inlines = tree.sole_ifc_child(id);
    if let Some(ifc) = of_inlines {
        assign_inline_containing_blocks(tree, ifc, child_ctx);
    }

    inline_box_model(tree, id, ctx)?;
    block_box_model(tree, id, ctx)?;

    // Child flow is now possible. A BFC root switches the context to its
    // own writing mode and collects its descendants on a fresh record.
    let is_bfc_root = tree.node(id).is_bfc_root();
    if is_bfc_root {
        child_ctx.writing_mode = tree.node(id).style.writing_mode;
    }

    if of_inlines.is_some() {
        inline::do_text_layout(tree, id, ctx, shaper)?;
        if is_bfc_root {
            position_boxes(tree, id, &child_ctx, &[])?;
        }
    } else {
        let children = tree.children(id).to_vec();
        for &child in &children {
            if !tree.node(child).is_block_level_container() {
                return Err(LayoutError::MixedChildren(id));
            }
        }
        if is_bfc_root {
            let mut nested = Vec::new();
            for child in children {
                layout_block_box(tree, child, &child_ctx, &mut nested, shaper)?;
            }
            position_boxes(tree, id, &child_ctx, &nested)?;
        } else {
            for child in children {
                layout_block_box(tree, child, &child_ctx, events, shaper)?;
            }
        }
    }

    events.push(BfcEvent::Post(id));
    Ok(())
}

/// Resolve every block container's areas to absolute coordinates, parent
/// before child.
///
/// Inline-level boxes are skipped: their geometry is published through the
/// inline formatting root's line list, not per-box areas.
pub fn resolve_areas(tree: &mut BoxTree, id: BoxId) -> Result<(), LayoutError> {
    let node = tree.node(id);
    let (border, padding, content) = (node.border_area, node.padding_area, node.content_area);
    tree.areas.resolve(border)?;
    tree.areas.resolve(padding)?;
    tree.areas.resolve(content)?;

    if tree.sole_ifc_child(id).is_some() {
        return Ok(());
    }
    let children = tree.children(id).to_vec();
    for child in children {
        resolve_areas(tree, child)?;
    }
    Ok(())
}
