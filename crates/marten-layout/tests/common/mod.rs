//! Shared builders for the layout integration tests.
//!
//! Tests construct documents programmatically (the HTML parser and cascade
//! live upstream of this engine): a [`Doc`] owns the element tree and the
//! computed-style map the engine consumes, with one helper per node kind.

#![allow(dead_code)]

use marten_dom::{DomTree, NodeId};
use marten_layout::{layout_document, BoxTree, LayoutError};
use marten_style::{AutoLength, Display, LengthValue, Style, StyleMap};
use marten_text::MetricShaper;

/// A document under construction: element tree plus computed styles.
pub struct Doc {
    pub dom: DomTree,
    pub styles: StyleMap,
    root: NodeId,
}

impl Doc {
    /// A document whose root element has the given style.
    pub fn with_root(style: Style) -> Doc {
        let mut dom = DomTree::new();
        let root = dom.append_element(NodeId::ROOT, "html");
        let mut styles = StyleMap::new();
        styles.insert(root, style);
        Doc { dom, styles, root }
    }

    /// A document with a default block root.
    pub fn new() -> Doc {
        Doc::with_root(Style::default())
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Append a `<div>` with the given style.
    pub fn block(&mut self, parent: NodeId, style: Style) -> NodeId {
        let id = self.dom.append_element(parent, "div");
        self.styles.insert(id, style);
        id
    }

    /// Append a `<span>` with the given style (inline display).
    pub fn inline(&mut self, parent: NodeId, mut style: Style) -> NodeId {
        style.display = Display::inline();
        let id = self.dom.append_element(parent, "span");
        self.styles.insert(id, style);
        id
    }

    /// Append a text node.
    pub fn text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.dom.append_text(parent, text)
    }

    /// Append a `<br>`.
    pub fn br(&mut self, parent: NodeId) -> NodeId {
        let id = self.dom.append_element(parent, "br");
        self.styles.insert(
            id,
            Style {
                display: Display::inline(),
                ..Style::default()
            },
        );
        id
    }

    /// Lay the document out against a viewport.
    pub fn layout(&self, width: f32, height: f32) -> BoxTree {
        init_logs();
        layout_document(&self.dom, &self.styles, (width, height), &MetricShaper)
            .expect("document should lay out")
    }

    /// Lay the document out, returning the error.
    pub fn try_layout(&self, width: f32, height: f32) -> Result<BoxTree, LayoutError> {
        init_logs();
        layout_document(&self.dom, &self.styles, (width, height), &MetricShaper)
    }
}

impl Default for Doc {
    fn default() -> Self {
        Doc::new()
    }
}

/// An absolute pixel value.
pub fn px(v: f32) -> AutoLength {
    AutoLength::px(v)
}

/// A percentage (0.5 = 50%).
pub fn percent(v: f32) -> AutoLength {
    AutoLength::Length(LengthValue::Percent(v))
}

/// Install the test logger once.
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}
