//! The box tree.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! "The following sections describe the types of boxes that may be
//! generated in CSS 2. A box's type affects, in part, its behavior in the
//! visual formatting model."
//!
//! Boxes live in an arena ([`BoxTree`]) with [`BoxId`] index identity,
//! alongside the [`Areas`] arena their geometry lives in. The box kinds
//! form a closed sum ([`BoxKind`]) — block container, inline box, inline
//! formatting root, forced break, text run — dispatched by matching, with
//! the box attributes (anonymous, inline-level, BFC root) as plain fields
//! rather than capability probes.
//!
//! Every box owns three nested areas: border ⊇ padding ⊇ content, each the
//! geometric parent of the next. The border area is re-parented onto the
//! box's containing block during containing-block assignment.

use owo_colors::OwoColorize;

use marten_style::{LogicalAxis, LogicalSide, Position, Style, WritingMode};
use marten_text::{FontExtents, ShapedItem, TextRun};

use crate::area::{AreaId, Areas, Rect};
use crate::error::LayoutError;
use crate::inline::Line;

/// Identity of a box: its index in the [`BoxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxId(pub usize);

/// Attributes of a block container.
///
/// [§ 9.2.1 Block-level elements and block boxes](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockData {
    /// True for an inline-level block container (`display: inline
    /// flow-root`); false for a block-level one. Fixed at construction.
    pub inline_level: bool,
    /// [§ 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// True if this box establishes a new block formatting context
    /// (flow-root inner display, orthogonal writing mode, or the document
    /// root).
    pub bfc_root: bool,
}

/// A non-root inline box's extent in its formatting context's collapsed
/// text buffer.
///
/// [§ 9.2.2 Inline-level elements and inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineData {
    /// Byte offset where the box's content starts.
    pub start: usize,
    /// Exclusive byte offset where the box's content ends.
    pub end: usize,
}

/// State owned by the root inline box of one inline formatting context.
///
/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// Exactly one of these exists per inline formatting context; it is always
/// the sole child of its block container. The text buffer, run list and
/// break offsets are fixed by IFC preparation; shaped items and the strut
/// arrive from the shaping service during preprocessing; lines and the
/// resolved block size are produced by text layout.
#[derive(Debug, Clone, Default)]
pub struct IfcData {
    /// The collapsed text buffer of the whole formatting context.
    pub text: String,
    /// The runs contributing to the buffer, in order.
    pub runs: Vec<BoxId>,
    /// Offsets in the buffer where `Break` boxes force line breaks.
    pub forced_breaks: Vec<usize>,
    /// Shaped items covering the buffer (from the shaping service).
    pub shaped: Vec<ShapedItem>,
    /// Strut font extents for the root's own style (CSS2
    /// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)).
    pub strut: Option<FontExtents>,
    /// Laid-out lines with resolved metrics.
    pub lines: Vec<Line>,
    /// The formatting context's resolved block size (sum of line heights).
    pub block_size: f32,
}

/// The closed set of box kinds.
#[derive(Debug, Clone)]
pub enum BoxKind {
    /// [§ 9.2.1](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
    ///
    /// A block container: its children are either all block-level block
    /// containers or exactly one inline formatting root.
    Block(BlockData),
    /// [§ 9.2.2](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    ///
    /// A non-root inline box.
    Inline(InlineData),
    /// The root inline box of an inline formatting context.
    IfcRoot(IfcData),
    /// A forced line break (`<br>`); participates in inline iteration but
    /// contributes nothing to shaping.
    Break,
    /// A text run leaf (supplied by the text subsystem).
    Run(TextRun),
}

/// One box: style, kind, children, and owned geometry.
#[derive(Debug)]
pub struct BoxNode {
    /// The box's computed style (owned; anonymous boxes get derived ones).
    pub style: Style,
    /// The box's kind and kind-specific state.
    pub kind: BoxKind,
    /// Children in document order. Immutable after construction except for
    /// whitespace-collapse pruning during IFC preparation.
    pub children: Vec<BoxId>,
    /// [§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// True for boxes with no corresponding document element.
    pub anonymous: bool,
    /// [§ 10.1](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
    ///
    /// The area this box's percentages and offsets resolve against;
    /// assigned by the containing-block pass.
    pub containing_block: Option<AreaId>,
    /// The border area (outermost of the three).
    pub border_area: AreaId,
    /// The padding area (inside the border area).
    pub padding_area: AreaId,
    /// The content area (innermost; containing block for descendants).
    pub content_area: AreaId,
}

impl BoxNode {
    /// True for a relatively or statically positioned box. Anonymous boxes
    /// position as static regardless of style.
    #[must_use]
    pub fn is_relative_or_static(&self) -> bool {
        self.anonymous
            || matches!(self.style.position, Position::Static | Position::Relative)
    }

    /// True for an absolutely positioned box.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        !self.anonymous && self.style.position == Position::Absolute
    }

    /// [§ 9.3.2](https://www.w3.org/TR/CSS2/visuren.html#position-props)
    ///
    /// "An element is said to be positioned if its 'position' property has
    /// a value other than 'static'."
    #[must_use]
    pub fn is_positioned(&self) -> bool {
        !self.anonymous && self.style.position != Position::Static
    }

    /// True for content that participates in inline formatting.
    #[must_use]
    pub fn is_inline_level(&self) -> bool {
        match &self.kind {
            BoxKind::Block(data) => data.inline_level,
            BoxKind::Inline(_) | BoxKind::IfcRoot(_) | BoxKind::Break | BoxKind::Run(_) => true,
        }
    }

    /// True for a block-level block container.
    #[must_use]
    pub fn is_block_level_container(&self) -> bool {
        matches!(&self.kind, BoxKind::Block(data) if !data.inline_level)
    }

    /// True if this block container establishes a block formatting context.
    #[must_use]
    pub fn is_bfc_root(&self) -> bool {
        matches!(&self.kind, BoxKind::Block(data) if data.bfc_root)
    }
}

/// The box tree: a box arena plus the area arena its geometry lives in.
#[derive(Debug, Default)]
pub struct BoxTree {
    boxes: Vec<BoxNode>,
    /// The geometry arena.
    pub areas: Areas,
    root: Option<BoxId>,
}

impl BoxTree {
    /// An empty tree (the builder fills it in).
    #[must_use]
    pub fn new() -> Self {
        BoxTree::default()
    }

    /// Allocate a box, wiring up its three nested areas
    /// (content parented to padding parented to border).
    pub fn alloc(&mut self, style: Style, kind: BoxKind, children: Vec<BoxId>, anonymous: bool) -> BoxId {
        let border_area = self.areas.alloc(None);
        let padding_area = self.areas.alloc(Some(border_area));
        let content_area = self.areas.alloc(Some(padding_area));
        let id = BoxId(self.boxes.len());
        self.boxes.push(BoxNode {
            style,
            kind,
            children,
            anonymous,
            containing_block: None,
            border_area,
            padding_area,
            content_area,
        });
        id
    }

    /// The root block container (set by the builder).
    #[must_use]
    pub fn root(&self) -> Option<BoxId> {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: BoxId) {
        self.root = Some(root);
    }

    /// Number of boxes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// True if no boxes were generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Borrow a box.
    #[must_use]
    pub fn node(&self, id: BoxId) -> &BoxNode {
        &self.boxes[id.0]
    }

    /// Mutably borrow a box.
    pub fn node_mut(&mut self, id: BoxId) -> &mut BoxNode {
        &mut self.boxes[id.0]
    }

    /// A box's children in document order.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        &self.boxes[id.0].children
    }

    /// The sole inline-formatting-root child, if this is a block container
    /// of inlines.
    ///
    /// [§ 9.2.1](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
    ///
    /// "a block container box either contains only block-level boxes or
    /// establishes an inline formatting context and thus contains only
    /// inline-level boxes" — the latter case is normalized to exactly one
    /// inline formatting root at build time.
    #[must_use]
    pub fn sole_ifc_child(&self, id: BoxId) -> Option<BoxId> {
        match self.children(id) {
            [child] if matches!(self.node(*child).kind, BoxKind::IfcRoot(_)) => Some(*child),
            _ => None,
        }
    }

    /// Borrow the IFC state of an inline formatting root.
    #[must_use]
    pub fn ifc(&self, id: BoxId) -> Option<&IfcData> {
        match &self.node(id).kind {
            BoxKind::IfcRoot(data) => Some(data),
            _ => None,
        }
    }

    /// Mutably borrow the IFC state of an inline formatting root.
    pub fn ifc_mut(&mut self, id: BoxId) -> Option<&mut IfcData> {
        match &mut self.node_mut(id).kind {
            BoxKind::IfcRoot(data) => Some(data),
            _ => None,
        }
    }

    /// The resolved border-area rectangle of a box, if resolution ran.
    #[must_use]
    pub fn border_rect(&self, id: BoxId) -> Option<Rect> {
        let area = self.areas.get(self.node(id).border_area);
        area.is_resolved().then(|| area.rect())
    }

    /// The resolved padding-area rectangle of a box, if resolution ran.
    #[must_use]
    pub fn padding_rect(&self, id: BoxId) -> Option<Rect> {
        let area = self.areas.get(self.node(id).padding_area);
        area.is_resolved().then(|| area.rect())
    }

    /// The resolved content-area rectangle of a box, if resolution ran.
    #[must_use]
    pub fn content_rect(&self, id: BoxId) -> Option<Rect> {
        let area = self.areas.get(self.node(id).content_area);
        area.is_resolved().then(|| area.rect())
    }

    /// Set a block container's content block size and propagate it outward
    /// through the padding and border areas.
    ///
    /// `writing_mode` is the mode of the formatting context the size is
    /// being measured in.
    ///
    /// # Errors
    ///
    /// Propagates area over-constraint errors.
    pub fn set_block_size(
        &mut self,
        id: BoxId,
        size: f32,
        writing_mode: WritingMode,
    ) -> Result<(), LayoutError> {
        let axis = writing_mode.physical_axis(LogicalAxis::Block);
        let node = &self.boxes[id.0];
        let (content, padding_area, border_area) =
            (node.content_area, node.padding_area, node.border_area);
        let style = node.style.logical(writing_mode);
        let padding_size =
            size + style.padding(LogicalSide::BlockStart) + style.padding(LogicalSide::BlockEnd);
        let border_size = padding_size
            + style.border_width(LogicalSide::BlockStart)
            + style.border_width(LogicalSide::BlockEnd);

        self.areas.set_size(content, axis, size)?;
        self.areas.set_size(padding_area, axis, padding_size)?;
        self.areas.set_size(border_area, axis, border_size)?;
        Ok(())
    }

    /// Set a block container's block-start position (border edge relative
    /// to its containing block) and nest the padding and content areas
    /// inside it.
    ///
    /// # Errors
    ///
    /// Propagates area over-constraint errors.
    pub fn set_block_position(
        &mut self,
        id: BoxId,
        position: f32,
        writing_mode: WritingMode,
    ) -> Result<(), LayoutError> {
        let side = writing_mode.physical_side(LogicalSide::BlockStart);
        let node = &self.boxes[id.0];
        let (content, padding_area, border_area) =
            (node.content_area, node.padding_area, node.border_area);
        let style = node.style.logical(writing_mode);
        let border_width = style.border_width(LogicalSide::BlockStart);
        let padding = style.padding(LogicalSide::BlockStart);

        self.areas.set_edge(border_area, side, position)?;
        self.areas.set_edge(padding_area, side, border_width)?;
        self.areas.set_edge(content, side, padding)?;
        Ok(())
    }

    /// Render the tree as an indented listing for debugging: one box per
    /// line with a kind symbol, anonymous boxes dimmed, formatting-context
    /// roots underlined.
    #[must_use]
    pub fn repr(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.repr_into(root, 0, &mut out);
        }
        out
    }

    fn repr_into(&self, id: BoxId, indent: usize, out: &mut String) {
        use std::fmt::Write as _;

        let node = self.node(id);
        let desc = match &node.kind {
            BoxKind::Block(data) => {
                let label = if data.inline_level { "Inline" } else { "Block" };
                let label = format!("▣ {label} {}", id.0);
                if data.bfc_root {
                    format!("{}", label.underline())
                } else {
                    label
                }
            }
            BoxKind::Inline(_) => format!("▭ Inline {}", id.0),
            BoxKind::IfcRoot(_) => format!("{}", format!("▭ Ifc {}", id.0).underline()),
            BoxKind::Break => format!("⏎ Break {}", id.0),
            BoxKind::Run(run) => format!("\"{}\"", run.text),
        };
        let desc = if node.anonymous {
            format!("{}", desc.dimmed())
        } else {
            desc
        };
        let _ = writeln!(out, "{}{}", "  ".repeat(indent), desc);
        for &child in &node.children {
            self.repr_into(child, indent + 1, out);
        }
    }
}
