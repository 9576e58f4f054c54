//! Box-tree generation from the document tree.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! "The display property, determines the type of box or boxes that are
//! generated for an element."
//!
//! The builder normalizes arbitrary element/text content into the
//! homogeneous shape the rest of the engine relies on: every block
//! container holds either all block-level block containers or exactly one
//! inline formatting root. Where block and inline content are siblings,
//! anonymous block boxes wrap the inline runs per
//! [§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level).

use marten_dom::{DomTree, NodeId, NodeKind};
use marten_style::{InnerDisplay, OuterDisplay, Style, StyleMap};
use marten_text::TextRun;

use crate::error::LayoutError;
use crate::inline;
use crate::tree::{BlockData, BoxId, BoxKind, BoxTree, IfcData, InlineData};

/// Build the box tree for a document.
///
/// The document element becomes the root block container and always
/// establishes the initial block formatting context.
///
/// # Errors
///
/// Fatal on tree shapes the engine does not support (see
/// [`LayoutError::Unsupported`]).
pub fn build_box_tree(dom: &DomTree, styles: &StyleMap) -> Result<BoxTree, LayoutError> {
    let root_el = dom
        .document_element()
        .ok_or(LayoutError::Unsupported("document has no root element"))?;

    let mut tree = BoxTree::new();
    let builder = Builder { dom, styles };
    let root = builder.generate_block_container(&mut tree, root_el, None, true)?;
    tree.set_root(root);
    log::debug!(
        "built box tree: {} boxes for {} document nodes",
        tree.len(),
        dom.len()
    );
    Ok(tree)
}

struct Builder<'a> {
    dom: &'a DomTree,
    styles: &'a StyleMap,
}

impl Builder<'_> {
    fn style_of(&self, node: NodeId) -> Style {
        self.styles.get(&node).cloned().unwrap_or_default()
    }

    /// Generate the block container for one element.
    ///
    /// [§ 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// "Floats, absolutely positioned elements, block containers... that
    /// are not block boxes, and block boxes with 'overflow' other than
    /// 'visible'... establish new block formatting contexts" — of which
    /// this engine recognizes flow-root inner display, plus orthogonal
    /// writing modes
    /// ([Writing Modes § 3.1](https://www.w3.org/TR/css-writing-modes-4/#orthogonal-flows))
    /// and the document root.
    fn generate_block_container(
        &self,
        tree: &mut BoxTree,
        el: NodeId,
        parent_el: Option<NodeId>,
        is_document_root: bool,
    ) -> Result<BoxId, LayoutError> {
        let style = self.style_of(el);

        let orthogonal = parent_el.is_some_and(|p| {
            style
                .writing_mode
                .is_orthogonal_to(self.style_of(p).writing_mode)
        });
        let bfc_root =
            is_document_root || style.display.inner == InnerDisplay::FlowRoot || orthogonal;

        let mut boxes: Vec<BoxId> = Vec::new();
        let mut has_inline = false;
        let mut has_block = false;

        for &child in self.dom.children(el) {
            match self.dom.get(child).map(|n| &n.kind) {
                Some(NodeKind::Element(data)) if data.is_break() => {
                    has_inline = true;
                    boxes.push(tree.alloc(self.style_of(child), BoxKind::Break, Vec::new(), false));
                }
                Some(NodeKind::Element(_)) => {
                    let child_style = self.style_of(child);
                    match child_style.display.outer {
                        OuterDisplay::Block => {
                            has_block = true;
                            boxes.push(self.generate_block_container(
                                tree,
                                child,
                                Some(el),
                                false,
                            )?);
                        }
                        OuterDisplay::Inline => {
                            has_inline = true;
                            let generated = self.generate_inline_box(tree, child)?;
                            // Blocks nested inside the inline interrupt it
                            // and surface as siblings here.
                            has_block = has_block || generated.len() > 1;
                            boxes.extend(generated);
                        }
                    }
                }
                Some(NodeKind::Text(text)) => {
                    has_inline = true;
                    let run_style = style.anonymous();
                    let collapsible = run_style.white_space.collapses();
                    boxes.push(tree.alloc(
                        run_style,
                        BoxKind::Run(TextRun::new(text.clone(), collapsible)),
                        Vec::new(),
                        true,
                    ));
                }
                Some(NodeKind::Comment(_) | NodeKind::Document) | None => {}
            }
        }

        let data = BlockData {
            inline_level: style.display.outer == OuterDisplay::Inline,
            bfc_root,
        };

        // [§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
        //
        // Pure inline content forms a single inline formatting context;
        // mixed content gets its inline runs wrapped in anonymous blocks.
        if has_inline && !has_block {
            let ifc = self.create_ifc(tree, style.anonymous(), boxes)?;
            return Ok(tree.alloc(style, BoxKind::Block(data), vec![ifc], false));
        }

        if has_inline && has_block {
            boxes = self.wrap_inline_runs(tree, boxes, &style)?;
        }

        Ok(tree.alloc(style, BoxKind::Block(data), boxes, false))
    }

    /// Package inline-level boxes into an inline formatting root and run
    /// IFC preparation (text collection, white-space collapsing, pruning).
    fn create_ifc(
        &self,
        tree: &mut BoxTree,
        style: Style,
        children: Vec<BoxId>,
    ) -> Result<BoxId, LayoutError> {
        let ifc = tree.alloc(style, BoxKind::IfcRoot(IfcData::default()), children, true);
        inline::prepare(tree, ifc)?;
        Ok(ifc)
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "...the 'Some text' part generates an anonymous block box."
    ///
    /// Partition a mixed child sequence into maximal runs of inline-level
    /// content, wrap each in an anonymous block-level container holding
    /// one anonymous inline formatting root, and interleave with the real
    /// blocks, preserving order. A run that is entirely collapsible white
    /// space generates no box at all.
    fn wrap_inline_runs(
        &self,
        tree: &mut BoxTree,
        boxes: Vec<BoxId>,
        parent_style: &Style,
    ) -> Result<Vec<BoxId>, LayoutError> {
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < boxes.len() {
            let mut inlines = Vec::new();
            while i < boxes.len() && tree.node(boxes[i]).is_inline_level() {
                inlines.push(boxes[i]);
                i += 1;
            }

            if !inlines.is_empty() && !all_collapsible_ws(tree, &inlines) {
                let anon_style = parent_style.anonymous();
                let ifc = self.create_ifc(tree, anon_style.clone(), inlines)?;
                blocks.push(tree.alloc(
                    anon_style,
                    BoxKind::Block(BlockData::default()),
                    vec![ifc],
                    true,
                ));
            }

            if i < boxes.len() {
                let block = boxes[i];
                if !tree.node(block).is_block_level_container() {
                    return Err(LayoutError::MixedChildren(block));
                }
                blocks.push(block);
                i += 1;
            }
        }

        Ok(blocks)
    }

    /// Generate the inline box(es) for an inline element.
    ///
    /// [§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "When an inline box contains an in-flow block-level box, the inline
    /// box (and its inline ancestors within the same line box) are broken
    /// around the block-level box... and the block-level box becomes a
    /// sibling of those [anonymous] boxes."
    ///
    /// Returns the mapped inline boxes interleaved with any interrupting
    /// block containers, in document order; the caller wraps them.
    fn generate_inline_box(
        &self,
        tree: &mut BoxTree,
        el: NodeId,
    ) -> Result<Vec<BoxId>, LayoutError> {
        let mut path: Vec<usize> = Vec::new();
        let mut boxes = Vec::new();
        let mut more = true;

        while more {
            let (bail, mapped) = self.map_inline_tree(tree, el, &mut path, 0)?;
            more = bail;
            if let Some(id) = mapped {
                boxes.push(id);
            }

            // Emit the block-level element the mapper bailed on (and any
            // block siblings right after it), then resume the inline.
            // Forced breaks are inline-level whatever their style says.
            while let Some(block_el) = self.element_at_path(el, &path) {
                let is_break = self
                    .dom
                    .as_element(block_el)
                    .is_some_and(marten_dom::ElementData::is_break);
                if is_break || self.style_of(block_el).display.outer != OuterDisplay::Block {
                    break;
                }
                boxes.push(self.generate_block_container(tree, block_el, Some(el), false)?);
                if let Some(last) = path.last_mut() {
                    *last += 1;
                }
            }
        }

        Ok(boxes)
    }

    /// The element reached by descending `path` child indices from `el`,
    /// if the path is in bounds and lands on an element.
    fn element_at_path(&self, el: NodeId, path: &[usize]) -> Option<NodeId> {
        let mut current = el;
        for &index in path {
            current = *self.dom.children(current).get(index)?;
        }
        if self.dom.as_element(current).is_some() {
            Some(current)
        } else {
            None
        }
    }

    /// Map one inline element's subtree, stopping at the first block-level
    /// descendant.
    ///
    /// `path` is the resume cursor: one child index per nesting level,
    /// kept across calls so a bailed-out mapping continues exactly after
    /// the interrupting block. Returns `(bailed, mapped box)`.
    fn map_inline_tree(
        &self,
        tree: &mut BoxTree,
        el: NodeId,
        path: &mut Vec<usize>,
        level: usize,
    ) -> Result<(bool, Option<BoxId>), LayoutError> {
        let style = self.style_of(el);

        if style.display.outer != OuterDisplay::Inline {
            return Err(LayoutError::Unsupported(
                "inline mapper invoked on a block-level element",
            ));
        }

        if style.display.inner == InnerDisplay::FlowRoot {
            // An inline-level flow-root: a block container carried inside
            // the inline content (rejected later by IFC preparation, which
            // does not lay out inline-blocks). Its inline-level flag
            // follows from its outer display.
            let id = self.generate_block_container(tree, el, None, false)?;
            return Ok((false, Some(id)));
        }

        if path.len() <= level {
            path.push(0);
        }

        let mut bail = false;
        let mut children: Vec<BoxId> = Vec::new();

        while !bail && path[level] < self.dom.children(el).len() {
            let child = self.dom.children(el)[path[level]];
            let mut mapped: Option<BoxId> = None;

            match self.dom.get(child).map(|n| &n.kind) {
                Some(NodeKind::Element(data)) if data.is_break() => {
                    mapped =
                        Some(tree.alloc(self.style_of(child), BoxKind::Break, Vec::new(), false));
                }
                Some(NodeKind::Element(_)) => {
                    let child_style = self.style_of(child);
                    if child_style.display.outer == OuterDisplay::Block {
                        bail = true;
                    } else {
                        let (child_bail, child_box) =
                            self.map_inline_tree(tree, child, path, level + 1)?;
                        bail = child_bail;
                        mapped = child_box;
                    }
                }
                Some(NodeKind::Text(text)) => {
                    let run_style = style.anonymous();
                    let collapsible = run_style.white_space.collapses();
                    mapped = Some(tree.alloc(
                        run_style,
                        BoxKind::Run(TextRun::new(text.clone(), collapsible)),
                        Vec::new(),
                        true,
                    ));
                }
                Some(NodeKind::Comment(_) | NodeKind::Document) | None => {}
            }

            if let Some(id) = mapped {
                children.push(id);
            }
            if !bail {
                path[level] += 1;
            }
        }

        if !bail {
            path.pop();
        }

        Ok((
            bail,
            Some(tree.alloc(
                style,
                BoxKind::Inline(InlineData::default()),
                children,
                false,
            )),
        ))
    }
}

/// True if a prospective inline run consists of nothing but collapsible
/// white space (and so must not generate an anonymous block).
fn all_collapsible_ws(tree: &BoxTree, boxes: &[BoxId]) -> bool {
    let mut stack: Vec<BoxId> = boxes.to_vec();
    while let Some(id) = stack.pop() {
        match &tree.node(id).kind {
            BoxKind::Run(run) => {
                if !run.is_all_collapsible_ws() {
                    return false;
                }
            }
            BoxKind::Inline(_) => stack.extend(tree.children(id).iter().copied()),
            BoxKind::Break | BoxKind::Block(_) | BoxKind::IfcRoot(_) => return false,
        }
    }
    true
}
