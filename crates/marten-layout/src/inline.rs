//! Inline formatting context integration.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! The engine's side of the text pipeline, in three stages:
//!
//! 1. **Preparation** (build time): concatenate the formatting context's
//!    run text into one buffer, collapse white space through the text
//!    service, re-derive every box's extent in the collapsed buffer, and
//!    prune runs that collapsed away.
//! 2. **Preprocessing** (before any layout pass): fetch strut font extents
//!    and shaped items from the shaping service. May fan out across
//!    independent inline roots; must complete before layout begins.
//! 3. **Text layout** (during layout): request line boxes, accumulate
//!    per-line ascender/descender maxima over the strut floor, and convert
//!    the summed line heights into the block container's resolved block
//!    size.

use marten_style::{LineHeight, LogicalAxis, Style};
use marten_text::{
    collapse, FontExtents, Segment, ShapeRun, TextShaper, TextStyle,
};

use crate::error::LayoutError;
use crate::flow::LayoutContext;
use crate::tree::{BoxId, BoxKind, BoxTree, InlineData};

/// One laid-out line of an inline formatting context.
///
/// [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "The rectangular area that contains the boxes that form a line is
/// called a line box." Consumers (the painter) read these instead of
/// per-inline-box areas: a line locates a slice of the collapsed buffer
/// plus its metrics inside the block container's content area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Byte offset where the line's content starts in the collapsed buffer.
    pub start: usize,
    /// Exclusive byte offset where the line's content ends.
    pub end: usize,
    /// Measured inline advance of the line.
    pub width: f32,
    /// Distance from the line's baseline up to its block-start edge.
    pub ascender: f32,
    /// Distance from the line's baseline down to its block-end edge.
    pub descender: f32,
    /// Block-axis offset of the line's start edge within the content area.
    pub block_offset: f32,
}

impl Line {
    /// The line's block-axis extent.
    #[must_use]
    pub fn block_size(&self) -> f32 {
        self.ascender + self.descender
    }
}

/// The slice of a [`Style`] the text service consumes.
fn text_style(style: &Style) -> TextStyle {
    TextStyle {
        font_size: style.font_size,
        line_height: match style.line_height {
            LineHeight::Normal => None,
            LineHeight::Px(px) => Some(px),
        },
    }
}

/// CSS2 [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading) leading
/// and half-leading: scale the face extents to the style's font size and
/// distribute the line-height slack evenly above and below.
///
/// "The height of the inline box encloses all glyphs and half-leading on
/// each side."
///
/// Returns `(ascender, descender)` in pixels. Exported for consumers that
/// position glyph baselines (the painter).
#[must_use]
pub fn ascender_descender(style: &TextStyle, extents: FontExtents) -> (f32, f32) {
    let scale = style.font_size / extents.units_per_em;
    let px_height = (extents.ascender + extents.descender) * scale;
    let line_height = style
        .line_height
        .unwrap_or(px_height + extents.line_gap * scale);
    let half_leading = (line_height - px_height) / 2.0;
    (
        extents.ascender * scale + half_leading,
        extents.descender * scale + half_leading,
    )
}

/// Prepare a freshly built inline formatting root: collect text, collapse
/// white space, assign extents, prune collapsed-empty runs.
///
/// CSS Text Module Level 3, [§ 4.1](https://www.w3.org/TR/css-text-3/#white-space-rules)
/// (phase 1 collapsing), applied to the whole formatting context at once
/// so that runs collapse against their inline-box neighbors.
///
/// # Errors
///
/// [`LayoutError::Unsupported`] when the inline content holds an
/// inline-level block container (inline-block layout is out of scope).
pub fn prepare(tree: &mut BoxTree, ifc: BoxId) -> Result<(), LayoutError> {
    // Collect runs and their raw text, depth-first through non-root
    // inlines. Breaks contribute no text; their offsets are recorded in
    // the extent walk below, against collapsed positions.
    let mut text = String::new();
    let mut runs: Vec<BoxId> = Vec::new();
    let mut segments: Vec<Segment> = Vec::new();
    let mut stack: Vec<BoxId> = tree.children(ifc).iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        match &tree.node(id).kind {
            BoxKind::Run(run) => {
                let start = text.len();
                text.push_str(&run.text);
                segments.push(Segment {
                    start,
                    end: text.len(),
                    collapsible: run.collapsible,
                });
                runs.push(id);
            }
            BoxKind::Inline(_) => {
                for &child in tree.children(id).iter().rev() {
                    stack.push(child);
                }
            }
            BoxKind::Break => {}
            BoxKind::Block(_) | BoxKind::IfcRoot(_) => {
                return Err(LayoutError::Unsupported(
                    "inline-level block containers inside an inline formatting context",
                ));
            }
        }
    }

    let collapsed = collapse(&text, &segments);
    for (&run_id, &(start, end)) in runs.iter().zip(collapsed.ranges.iter()) {
        if let BoxKind::Run(run) = &mut tree.node_mut(run_id).kind {
            run.start = start;
            run.end = end;
        }
    }

    // Second walk: assign every inline box's extent in the collapsed
    // buffer, record forced-break offsets, and prune collapsed-empty runs
    // (rebuilding each child list rather than splicing under iteration).
    let mut cursor = 0usize;
    let mut forced_breaks = Vec::new();
    assign_extents(tree, ifc, &mut cursor, &mut forced_breaks);

    let kept_runs: Vec<BoxId> = runs
        .into_iter()
        .filter(|&id| match &tree.node(id).kind {
            BoxKind::Run(run) => !run.is_collapsed_empty(),
            _ => false,
        })
        .collect();

    if let Some(data) = tree.ifc_mut(ifc) {
        data.text = collapsed.text;
        data.runs = kept_runs;
        data.forced_breaks = forced_breaks;
    }
    Ok(())
}

/// Walk an inline subtree assigning `start`/`end` extents from the
/// collapsed run ranges, pruning empty runs as it goes.
fn assign_extents(tree: &mut BoxTree, id: BoxId, cursor: &mut usize, breaks: &mut Vec<usize>) {
    let start = *cursor;
    let children = tree.children(id).to_vec();
    let mut kept = Vec::with_capacity(children.len());

    for child in children {
        match &tree.node(child).kind {
            BoxKind::Run(run) => {
                if run.is_collapsed_empty() {
                    continue;
                }
                *cursor = run.end;
                kept.push(child);
            }
            BoxKind::Break => {
                breaks.push(*cursor);
                kept.push(child);
            }
            BoxKind::Inline(_) => {
                assign_extents(tree, child, cursor, breaks);
                kept.push(child);
            }
            BoxKind::Block(_) | BoxKind::IfcRoot(_) => {
                // Rejected during collection; nothing reaches here.
                kept.push(child);
            }
        }
    }

    let end = *cursor;
    let node = tree.node_mut(id);
    node.children = kept;
    if let BoxKind::Inline(data) = &mut node.kind {
        *data = InlineData { start, end };
    }
}

/// Preprocess one inline formatting root: strut extents for the root's
/// style, then shaped items for the whole buffer.
///
/// Layout assumes shaping results are materialized before any pass runs;
/// the orchestration in [`crate::layout_document`] preprocesses every
/// inline root in the tree up front. Each root's buffers are exclusively
/// its own, so a concurrent driver may fan these calls out per root and
/// join before layout.
///
/// # Errors
///
/// Any service failure aborts preprocessing; no partial result is kept.
pub fn preprocess(
    tree: &mut BoxTree,
    ifc: BoxId,
    shaper: &dyn TextShaper,
) -> Result<(), LayoutError> {
    let strut_style = text_style(&tree.node(ifc).style);
    let strut = shaper.extents(&strut_style)?;

    let run_ids = tree
        .ifc(ifc)
        .map(|data| data.runs.clone())
        .unwrap_or_default();
    let shape_runs: Vec<ShapeRun> = run_ids
        .iter()
        .filter_map(|&id| {
            let node = tree.node(id);
            match &node.kind {
                BoxKind::Run(run) => Some(ShapeRun {
                    start: run.start,
                    end: run.end,
                    style: text_style(&node.style),
                }),
                _ => None,
            }
        })
        .collect();

    let text = tree.ifc(ifc).map(|d| d.text.clone()).unwrap_or_default();
    let shaped = shaper.shape(&text, &shape_runs)?;

    if let Some(data) = tree.ifc_mut(ifc) {
        data.strut = Some(strut);
        data.shaped = shaped;
    }
    Ok(())
}

/// Lay out the text of a block container whose sole child is an inline
/// formatting root, filling in the root's lines and the container's
/// resolved block size.
///
/// # Errors
///
/// [`LayoutError::MixedChildren`] when the box is not a container of
/// inlines; [`LayoutError::Unsupported`] when preprocessing did not run or
/// the available inline size is undetermined (orthogonal auto sizing).
pub fn do_text_layout(
    tree: &mut BoxTree,
    block: BoxId,
    ctx: &LayoutContext,
    shaper: &dyn TextShaper,
) -> Result<(), LayoutError> {
    let ifc = tree
        .sole_ifc_child(block)
        .ok_or(LayoutError::MixedChildren(block))?;
    let writing_mode = ctx.writing_mode;

    let content_area = tree.node(block).content_area;
    let available = tree
        .areas
        .size_if_determined(content_area, writing_mode.physical_axis(LogicalAxis::Inline))
        .ok_or(LayoutError::Unsupported(
            "auto inline size for orthogonal writing modes",
        ))?;

    // Pull the inputs out; the arena cannot be borrowed across the
    // mutation below.
    let (text, shaped, forced_breaks, strut) = {
        let data = tree.ifc(ifc).ok_or(LayoutError::MixedChildren(block))?;
        let strut = data.strut.ok_or(LayoutError::Unsupported(
            "text layout invoked before preprocessing",
        ))?;
        (
            data.text.clone(),
            data.shaped.clone(),
            data.forced_breaks.clone(),
            strut,
        )
    };
    let run_spans: Vec<(usize, usize, TextStyle)> = tree
        .ifc(ifc)
        .map(|data| {
            data.runs
                .iter()
                .filter_map(|&id| match &tree.node(id).kind {
                    BoxKind::Run(run) => {
                        Some((run.start, run.end, text_style(&tree.node(id).style)))
                    }
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let strut_metrics = ascender_descender(&text_style(&tree.node(ifc).style), strut);

    let lineboxes = shaper.break_lines(&text, &shaped, &forced_breaks, available);

    // Runs are the smallest ranges that can change style, and shaped items
    // the smallest that can change face, so line height is the maximum
    // over every (run, item) pair contributing to the line — floored by
    // the strut, which gives empty lines their height.
    let mut lines = Vec::with_capacity(lineboxes.len());
    let mut block_size = 0.0_f32;
    for linebox in &lineboxes {
        let mut ascender = strut_metrics.0;
        let mut descender = strut_metrics.1;

        for &(run_start, run_end, run_style) in &run_spans {
            if run_start >= linebox.end || run_end <= linebox.start {
                continue;
            }
            for item in &shaped {
                let start = item.start.max(run_start).max(linebox.start);
                let end = item.end.min(run_end).min(linebox.end);
                if start >= end {
                    continue;
                }
                let (a, d) = ascender_descender(&run_style, item.extents);
                ascender = ascender.max(a);
                descender = descender.max(d);
            }
        }

        lines.push(Line {
            start: linebox.start,
            end: linebox.end,
            width: linebox.width,
            ascender,
            descender,
            block_offset: block_size,
        });
        block_size += ascender + descender;
    }

    if let Some(data) = tree.ifc_mut(ifc) {
        data.lines = lines;
        data.block_size = block_size;
    }

    // [§ 10.6.3](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    //
    // "the height is the distance between the top content edge and the
    // bottom edge of the last line box, if the box establishes an inline
    // formatting context with one or more lines."
    let style = tree.node(block).style.logical(writing_mode);
    if style.block_size().is_auto() {
        tree.set_block_size(block, block_size, writing_mode)?;
    }
    Ok(())
}
