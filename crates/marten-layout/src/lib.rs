//! CSS2.2 block and inline layout with writing-mode support.
//!
//! # Scope
//!
//! This crate computes the geometry and text-line layout of a box tree
//! derived from a document: given an element tree and its computed styles,
//! it produces absolute, pixel-resolved rectangles for every block box and
//! metric-resolved lines for every run of text. It implements:
//!
//! - **Constrained geometry** ([`area`]) — partially specified rectangles
//!   resolved against their parents, with writing-mode-relative access.
//! - **The box tree** ([`tree`]) — block containers, inline boxes, inline
//!   formatting roots, forced breaks, text runs
//!   ([§ 9.2](https://www.w3.org/TR/CSS2/visuren.html#box-gen)).
//! - **Box generation** ([`builder`]) — element tree → box tree, with
//!   anonymous-box normalization per
//!   [§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level).
//! - **Margin collapsing** ([`margin`]) —
//!   [§ 8.3.1](https://www.w3.org/TR/CSS2/box.html#collapsing-margins).
//! - **Block flow** ([`flow`]) — the § 10.3.3 / § 10.6.3 box models,
//!   block-formatting-context positioning, containing-block assignment
//!   ([§ 10.1](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)),
//!   and the recursive orchestrator.
//! - **Inline formatting** ([`inline`]) — white-space-collapsed text
//!   buffers, shaping service integration, and line-box metrics
//!   ([§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting),
//!   [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)).
//!
//! Out of scope, consumed as external collaborators: the style cascade
//! (`marten-style` hands in ready computed values), text shaping and line
//! breaking (`marten-text`'s [`TextShaper`] service), the document model
//! (`marten-dom`), and painting (which only reads the resolved geometry).
//!
//! # Not implemented
//!
//! Floats, absolute positioning placement, tables, grid, and inline-block
//! layout are deliberately unsupported and surface as fatal
//! [`LayoutError`]s rather than approximations.
//!
//! # Entry point
//!
//! [`layout_document`] chains the phases: build the box tree, preprocess
//! every inline formatting root through the shaping service, lay out, and
//! resolve all areas to absolute coordinates.
//!
//! ```
//! use marten_dom::DomTree;
//! use marten_layout::layout_document;
//! use marten_style::{Style, StyleMap};
//! use marten_text::MetricShaper;
//!
//! let mut dom = DomTree::new();
//! let root = dom.append_element(dom.root(), "html");
//! dom.append_text(root, "hello world");
//!
//! let mut styles = StyleMap::new();
//! styles.insert(root, Style::default());
//!
//! let tree = layout_document(&dom, &styles, (800.0, 600.0), &MetricShaper).unwrap();
//! let rect = tree.border_rect(tree.root().unwrap()).unwrap();
//! assert_eq!(rect.width, 800.0);
//! ```

pub mod area;
pub mod builder;
pub mod error;
pub mod flow;
pub mod inline;
pub mod margin;
pub mod tree;

pub use area::{Area, AreaId, Areas, Rect};
pub use builder::build_box_tree;
pub use error::{LayoutError, ShapeErrorKind};
pub use flow::{layout_block_box, position_boxes, resolve_areas, BfcEvent, LayoutContext};
pub use inline::{ascender_descender, Line};
pub use margin::{collapsed_value, MarginCollapseContext, MarginMaps};
pub use tree::{BlockData, BoxId, BoxKind, BoxNode, BoxTree, IfcData, InlineData};

use marten_dom::DomTree;
use marten_style::StyleMap;
use marten_text::TextShaper;

/// Preprocess every inline formatting root in the tree: strut extents and
/// shaped items from the shaping service.
///
/// Must complete before [`layout`] runs — layout assumes shaping results
/// are materialized. Each root's buffers are exclusively its own, so the
/// per-root calls are independent; this driver issues them sequentially
/// and aborts on the first failure.
///
/// # Errors
///
/// Propagates shaping-service failures; no partial result is kept.
pub fn preprocess(tree: &mut BoxTree, shaper: &dyn TextShaper) -> Result<(), LayoutError> {
    for i in 0..tree.len() {
        let id = BoxId(i);
        if matches!(tree.node(id).kind, BoxKind::IfcRoot(_)) {
            inline::preprocess(tree, id, shaper)?;
        }
    }
    Ok(())
}

/// Lay out a prepared, preprocessed box tree against a viewport and
/// resolve every block container's areas to absolute coordinates.
///
/// The viewport becomes the initial containing block; the root box
/// participates in a synthetic outer formatting context so that its own
/// margins place it within the viewport.
///
/// # Errors
///
/// All failures are fatal programmer/ordering errors; see [`LayoutError`].
pub fn layout(
    tree: &mut BoxTree,
    viewport: (f32, f32),
    shaper: &dyn TextShaper,
) -> Result<(), LayoutError> {
    let root = tree
        .root()
        .ok_or(LayoutError::Unsupported("layout of an empty box tree"))?;

    let icb = tree
        .areas
        .alloc_resolved(Rect::new(0.0, 0.0, viewport.0, viewport.1));
    let ctx = LayoutContext {
        writing_mode: tree.node(root).style.writing_mode,
        last_block_container_area: icb,
        last_positioned_area: icb,
    };

    let mut events = Vec::new();
    flow::layout_block_box(tree, root, &ctx, &mut events, shaper)?;
    flow::position_boxes(tree, root, &ctx, &events)?;
    flow::resolve_areas(tree, root)?;
    Ok(())
}

/// Build, preprocess, lay out, and resolve a document in one call.
///
/// # Errors
///
/// Propagates every phase's fatal errors; a caller receiving one must
/// treat the document as unlayoutable (there is no partial geometry).
pub fn layout_document(
    dom: &DomTree,
    styles: &StyleMap,
    viewport: (f32, f32),
    shaper: &dyn TextShaper,
) -> Result<BoxTree, LayoutError> {
    let mut tree = build_box_tree(dom, styles)?;
    preprocess(&mut tree, shaper)?;
    layout(&mut tree, viewport, shaper)?;
    log::debug!(
        "layout complete: {} boxes against {}x{} viewport",
        tree.len(),
        viewport.0,
        viewport.1
    );
    Ok(tree)
}
