//! Box-tree builder shapes.
//!
//! [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
//!
//! "When an inline box contains an in-flow block-level box, the inline box
//! ... is broken around the block-level box."

mod common;

use common::Doc;
use marten_layout::{build_box_tree, BoxKind, BoxTree};
use marten_style::Style;

fn build(doc: &Doc) -> BoxTree {
    common::init_logs();
    build_box_tree(&doc.dom, &doc.styles).expect("tree should build")
}

fn root_children(tree: &BoxTree) -> Vec<marten_layout::BoxId> {
    tree.children(tree.root().expect("tree has a root")).to_vec()
}

#[test]
fn pure_inline_content_becomes_one_ifc_root() {
    let mut doc = Doc::new();
    doc.text(doc.root(), "hello");

    let tree = build(&doc);
    let children = root_children(&tree);
    assert_eq!(children.len(), 1);
    let ifc = children[0];
    assert!(matches!(tree.node(ifc).kind, BoxKind::IfcRoot(_)));
    assert!(tree.node(ifc).anonymous);
    assert_eq!(tree.sole_ifc_child(tree.root().unwrap()), Some(ifc));
}

#[test]
fn mixed_content_wraps_the_inline_run_in_place() {
    // Inline first: [anonymous block, real block].
    let mut doc = Doc::new();
    doc.text(doc.root(), "hello");
    doc.block(doc.root(), Style::default());

    let tree = build(&doc);
    let children = root_children(&tree);
    assert_eq!(children.len(), 2);
    assert!(tree.node(children[0]).anonymous);
    assert!(tree.sole_ifc_child(children[0]).is_some());
    assert!(!tree.node(children[1]).anonymous);

    // Block first: the anonymous wrapper lands after it.
    let mut doc = Doc::new();
    doc.block(doc.root(), Style::default());
    doc.text(doc.root(), "hello");

    let tree = build(&doc);
    let children = root_children(&tree);
    assert_eq!(children.len(), 2);
    assert!(!tree.node(children[0]).anonymous);
    assert!(tree.node(children[1]).anonymous);
    assert!(tree.sole_ifc_child(children[1]).is_some());
}

#[test]
fn all_collapsible_whitespace_run_generates_no_box() {
    // The wrapped inline run is pure collapsible white space: zero boxes,
    // not a zero-sized one.
    let mut doc = Doc::new();
    doc.text(doc.root(), "  \n\t ");
    doc.block(doc.root(), Style::default());

    let tree = build(&doc);
    let children = root_children(&tree);
    assert_eq!(children.len(), 1);
    assert!(!tree.node(children[0]).anonymous);
}

#[test]
fn inline_element_splits_around_a_block_child() {
    // <span>a<div></div>b</span>: the inline is broken around the block,
    // which becomes a sibling of two anonymous wrappers.
    let mut doc = Doc::new();
    let span = doc.inline(doc.root(), Style::default());
    doc.text(span, "a");
    doc.block(span, Style::default());
    doc.text(span, "b");

    let tree = build(&doc);
    let children = root_children(&tree);
    assert_eq!(children.len(), 3);

    assert!(tree.node(children[0]).anonymous);
    assert!(!tree.node(children[1]).anonymous);
    assert!(tree.node(children[2]).anonymous);

    // Each wrapper holds one inline formatting root whose content is a
    // continuation of the same source inline.
    for &wrapper in &[children[0], children[2]] {
        let ifc = tree.sole_ifc_child(wrapper).expect("wrapper holds an IFC");
        let inline = tree.children(ifc)[0];
        assert!(matches!(tree.node(inline).kind, BoxKind::Inline(_)));
    }

    let first_ifc = tree.sole_ifc_child(children[0]).unwrap();
    let last_ifc = tree.sole_ifc_child(children[2]).unwrap();
    assert_eq!(tree.ifc(first_ifc).unwrap().text, "a");
    assert_eq!(tree.ifc(last_ifc).unwrap().text, "b");
}

#[test]
fn break_elements_become_break_boxes_with_offsets() {
    let mut doc = Doc::new();
    doc.text(doc.root(), "ab");
    doc.br(doc.root());
    doc.text(doc.root(), "cd");

    let tree = build(&doc);
    let ifc = tree.sole_ifc_child(tree.root().unwrap()).unwrap();
    let kinds: Vec<bool> = tree
        .children(ifc)
        .iter()
        .map(|&c| matches!(tree.node(c).kind, BoxKind::Break))
        .collect();
    assert_eq!(kinds, vec![false, true, false]);

    let data = tree.ifc(ifc).unwrap();
    assert_eq!(data.text, "abcd");
    assert_eq!(data.forced_breaks, vec![2]);
}

#[test]
fn runs_collapsed_to_nothing_are_pruned() {
    // "a " + <span> " " </span> + "b": the span's run collapses into the
    // space already contributed by the first run and is pruned.
    let mut doc = Doc::new();
    doc.text(doc.root(), "a ");
    let span = doc.inline(doc.root(), Style::default());
    doc.text(span, " ");
    doc.text(doc.root(), "b");

    let tree = build(&doc);
    let ifc = tree.sole_ifc_child(tree.root().unwrap()).unwrap();
    let data = tree.ifc(ifc).unwrap();
    assert_eq!(data.text, "a b");
    assert_eq!(data.runs.len(), 2);

    // The span survives but holds no runs any more, and its extent in the
    // collapsed buffer is empty.
    let span_box = tree
        .children(ifc)
        .iter()
        .copied()
        .find(|&c| matches!(tree.node(c).kind, BoxKind::Inline(_)))
        .expect("span box exists");
    assert!(tree.children(span_box).is_empty());
    if let BoxKind::Inline(extent) = &tree.node(span_box).kind {
        assert_eq!(extent.start, extent.end);
    }
}

#[test]
fn nested_inline_extents_cover_their_runs() {
    // "x" <span>"yy"</span> "z" — the span's extent is the middle range.
    let mut doc = Doc::new();
    doc.text(doc.root(), "x");
    let span = doc.inline(doc.root(), Style::default());
    doc.text(span, "yy");
    doc.text(doc.root(), "z");

    let tree = build(&doc);
    let ifc = tree.sole_ifc_child(tree.root().unwrap()).unwrap();
    assert_eq!(tree.ifc(ifc).unwrap().text, "xyyz");

    let span_box = tree
        .children(ifc)
        .iter()
        .copied()
        .find(|&c| matches!(tree.node(c).kind, BoxKind::Inline(_)))
        .unwrap();
    if let BoxKind::Inline(extent) = &tree.node(span_box).kind {
        assert_eq!((extent.start, extent.end), (1, 3));
    }
}

#[test]
fn repr_lists_every_box() {
    let mut doc = Doc::new();
    doc.text(doc.root(), "hello");
    doc.block(doc.root(), Style::default());

    let tree = build(&doc);
    let repr = tree.repr();
    assert!(repr.contains("Block"));
    assert!(repr.contains("Ifc"));
    assert!(repr.contains("hello"));
}
