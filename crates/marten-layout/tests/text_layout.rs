//! Inline formatting: line metrics, wrapping, forced breaks.
//!
//! The metric shaper advances 0.6 em per character and reports 800/200
//! extents on a 1000-unit em, so `line-height: normal` equals the font
//! size exactly.

mod common;

use common::{px, Doc};
use marten_style::{LineHeight, Style};

#[test]
fn single_line_sets_the_block_size() {
    let mut doc = Doc::new();
    doc.text(doc.root(), "hello world");

    let tree = doc.layout(800.0, 600.0);
    let root = tree.root().unwrap();
    assert_eq!(tree.content_rect(root).unwrap().height, 16.0);

    let ifc = tree.sole_ifc_child(root).unwrap();
    let data = tree.ifc(ifc).unwrap();
    assert_eq!(data.lines.len(), 1);
    let line = data.lines[0];
    assert_eq!(line.ascender, 12.8);
    assert_eq!(line.descender, 3.2);
    assert_eq!(line.block_offset, 0.0);
    // 11 characters at 0.6 × 16px.
    assert!((line.width - 105.6).abs() < 1e-3);
}

#[test]
fn lines_wrap_at_the_available_inline_size() {
    // 6px per character at font-size 10; width 42 fits "aaa bbb" and
    // wraps "ccc" onto a second line.
    let mut doc = Doc::with_root(Style {
        width: px(42.0),
        font_size: 10.0,
        ..Style::default()
    });
    doc.text(doc.root(), "aaa bbb ccc");

    let tree = doc.layout(800.0, 600.0);
    let root = tree.root().unwrap();
    assert_eq!(tree.content_rect(root).unwrap().height, 20.0);

    let ifc = tree.sole_ifc_child(root).unwrap();
    let data = tree.ifc(ifc).unwrap();
    assert_eq!(data.lines.len(), 2);
    assert_eq!(data.lines[1].block_offset, 10.0);
    assert_eq!(&data.text[data.lines[1].start..data.lines[1].end], "ccc");
}

#[test]
fn forced_breaks_end_lines() {
    let mut doc = Doc::new();
    doc.text(doc.root(), "ab");
    doc.br(doc.root());
    doc.text(doc.root(), "cd");

    let tree = doc.layout(800.0, 600.0);
    let root = tree.root().unwrap();
    assert_eq!(tree.content_rect(root).unwrap().height, 32.0);

    let ifc = tree.sole_ifc_child(root).unwrap();
    let data = tree.ifc(ifc).unwrap();
    let rendered: Vec<&str> = data
        .lines
        .iter()
        .map(|l| &data.text[l.start..l.end])
        .collect();
    assert_eq!(rendered, vec!["ab", "cd"]);
}

#[test]
fn a_lone_break_still_produces_a_line() {
    let mut doc = Doc::new();
    doc.br(doc.root());

    let tree = doc.layout(800.0, 600.0);
    let root = tree.root().unwrap();
    // One empty line at strut height.
    assert_eq!(tree.content_rect(root).unwrap().height, 16.0);
}

#[test]
fn explicit_line_height_distributes_half_leading() {
    let mut doc = Doc::with_root(Style {
        line_height: LineHeight::Px(20.0),
        ..Style::default()
    });
    doc.text(doc.root(), "x");

    let tree = doc.layout(800.0, 600.0);
    let root = tree.root().unwrap();
    assert_eq!(tree.content_rect(root).unwrap().height, 20.0);

    let ifc = tree.sole_ifc_child(root).unwrap();
    let line = tree.ifc(ifc).unwrap().lines[0];
    // 16px of glyphs in a 20px line: 2px of leading on each side.
    assert_eq!(line.ascender, 14.8);
    assert_eq!(line.descender, 5.2);
}

#[test]
fn collapsed_whitespace_shortens_the_buffer() {
    let mut doc = Doc::new();
    doc.text(doc.root(), "  a \t\n  b ");

    let tree = doc.layout(800.0, 600.0);
    let ifc = tree.sole_ifc_child(tree.root().unwrap()).unwrap();
    let data = tree.ifc(ifc).unwrap();
    assert_eq!(data.text, "a b ");
    // Width measures the line minus the trailing collapsed space.
    assert!((data.lines[0].width - 3.0 * 9.6).abs() < 1e-3);
}

#[test]
fn larger_inline_font_raises_the_line() {
    // Mixed font sizes on one line: the line box grows to the tallest
    // contributor, not the strut.
    let mut doc = Doc::new();
    doc.text(doc.root(), "a");
    let big = doc.inline(
        doc.root(),
        Style {
            font_size: 32.0,
            ..Style::default()
        },
    );
    doc.text(big, "b");

    let tree = doc.layout(800.0, 600.0);
    let root = tree.root().unwrap();
    assert_eq!(tree.content_rect(root).unwrap().height, 32.0);

    let ifc = tree.sole_ifc_child(root).unwrap();
    let line = tree.ifc(ifc).unwrap().lines[0];
    assert_eq!(line.ascender, 25.6);
    assert_eq!(line.descender, 6.4);
}

#[test]
fn explicit_block_size_wins_over_line_extent() {
    let mut doc = Doc::new();
    let fixed = doc.block(
        doc.root(),
        Style {
            height: px(50.0),
            ..Style::default()
        },
    );
    doc.text(fixed, "hello");

    let tree = doc.layout(800.0, 600.0);
    let block = tree.children(tree.root().unwrap())[0];
    assert_eq!(tree.content_rect(block).unwrap().height, 50.0);

    // The line metrics are still produced for the painter.
    let ifc = tree.sole_ifc_child(block).unwrap();
    assert_eq!(tree.ifc(ifc).unwrap().lines.len(), 1);
}

#[test]
fn text_after_a_block_sibling_starts_below_it() {
    // Mixed content: the anonymous wrapper around the trailing text is a
    // sibling block and stacks below.
    let mut doc = Doc::new();
    doc.block(
        doc.root(),
        Style {
            height: px(40.0),
            ..Style::default()
        },
    );
    doc.text(doc.root(), "tail");

    let tree = doc.layout(800.0, 600.0);
    let root = tree.root().unwrap();
    let wrapper = tree.children(root)[1];
    let rect = tree.border_rect(wrapper).unwrap();
    assert_eq!(rect.y, 40.0);
    assert_eq!(rect.height, 16.0);
    assert_eq!(tree.content_rect(root).unwrap().height, 56.0);
}
