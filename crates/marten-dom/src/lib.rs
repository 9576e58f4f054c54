//! Input element/text tree for the marten layout engine.
//!
//! This crate provides the arena-based document tree that layout consumes.
//! It is deliberately small: layout reads structure (children, in order),
//! element local names, and text content. Everything else that a full DOM
//! carries — attributes, namespaces, mutation events — belongs to the
//! document layer that produces this tree and is of no concern to layout.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow
//! checker issues. Computed styles are *not* stored here; the style system
//! hands layout a separate read-only `NodeId -> style` map so that this
//! crate stays dependency-free.

/// A type-safe index into the document tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing
/// issues, and is the key under which the style system publishes computed
/// styles for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    ///
    /// The document node; serves as the parent of the root element.
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    ///
    /// An element; only its local name is relevant to box generation.
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    ///
    /// A text node; becomes a text run leaf in the box tree.
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    ///
    /// A comment; generates no boxes and is skipped by the box-tree builder.
    Comment(String),
}

/// Element-specific data.
///
/// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
///
/// "When an element is created, its local name is always given."
///
/// Layout needs the local name for exactly one purpose: recognizing forced
/// line breaks (`<br>`). Attributes are consumed upstream by the style
/// system and never reach layout.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// The element's local name, lowercase.
    pub tag_name: String,
}

impl ElementData {
    /// True if this element is a forced line break (`<br>`).
    #[must_use]
    pub fn is_break(&self) -> bool {
        self.tag_name.eq_ignore_ascii_case("br")
    }
}

/// A node in the document tree.
///
/// Stores indices for parent/child relationships, enabling O(1) traversal.
#[derive(Debug, Clone)]
pub struct Node {
    /// The node's kind and kind-specific data.
    pub kind: NodeKind,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent."
    pub parent: Option<NodeId>,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children", in document order.
    pub children: Vec<NodeId>,
}

/// Arena-based document tree with O(1) node access.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
///
/// All nodes live in a contiguous vector, using indices for relationships:
/// O(1) access by [`NodeId`], no borrowing issues, and stable identity for
/// the lifetime of the tree. The Document node is always at index 0.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree containing just the Document node.
    #[must_use]
    pub fn new() -> Self {
        DomTree {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the tree (including the Document node).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True only for a tree that lost its Document node (never happens via
    /// this API; present for completeness).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID. The node is not yet attached.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Appends `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is
    /// that document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| matches!(self.get(id).map(|n| &n.kind), Some(NodeKind::Element(_))))
            .copied()
    }

    /// Convenience constructor: allocate an element and attach it.
    pub fn append_element(&mut self, parent: NodeId, tag_name: &str) -> NodeId {
        let id = self.alloc(NodeKind::Element(ElementData {
            tag_name: tag_name.to_ascii_lowercase(),
        }));
        self.append_child(parent, id);
        id
    }

    /// Convenience constructor: allocate a text node and attach it.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.alloc(NodeKind::Text(text.to_string()));
        self.append_child(parent, id);
        id
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_element_skips_non_elements() {
        let mut tree = DomTree::new();
        let _comment = tree.alloc(NodeKind::Comment("x".to_string()));
        let c = tree.alloc(NodeKind::Comment("y".to_string()));
        tree.append_child(tree.root(), c);
        let html = tree.append_element(tree.root(), "html");
        assert_eq!(tree.document_element(), Some(html));
    }

    #[test]
    fn children_preserve_document_order() {
        let mut tree = DomTree::new();
        let root_el = tree.append_element(tree.root(), "div");
        let a = tree.append_element(root_el, "p");
        let t = tree.append_text(root_el, "hello");
        let b = tree.append_element(root_el, "p");
        assert_eq!(tree.children(root_el), &[a, t, b]);
        assert_eq!(tree.parent(t), Some(root_el));
        assert_eq!(tree.as_text(t), Some("hello"));
        assert!(tree.as_element(b).is_some());
    }
}
