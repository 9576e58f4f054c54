//! Serialized geometry snapshot of a small layout.
//!
//! The resolved rectangles serialize (the painter boundary is plain
//! geometry), so a whole layout can be compared as one JSON value.

mod common;

use common::{px, Doc};
use marten_style::{LengthValue, Style};
use serde_json::json;

#[test]
fn two_block_snapshot() {
    let mut doc = Doc::with_root(Style {
        width: px(100.0),
        ..Style::default()
    });
    doc.block(
        doc.root(),
        Style {
            height: px(10.0),
            ..Style::default()
        },
    );
    doc.block(
        doc.root(),
        Style {
            height: px(20.0),
            margin_top: px(5.0),
            padding_top: LengthValue::Px(3.0),
            ..Style::default()
        },
    );

    let tree = doc.layout(800.0, 600.0);
    let root = tree.root().unwrap();

    let mut boxes = vec![serde_json::to_value(tree.border_rect(root).unwrap()).unwrap()];
    for &child in tree.children(root) {
        boxes.push(serde_json::to_value(tree.border_rect(child).unwrap()).unwrap());
        boxes.push(serde_json::to_value(tree.content_rect(child).unwrap()).unwrap());
    }

    // Child two: 5px collapsed margin, 3px top padding; the root wraps
    // both children (10 + 5 + 3 + 20 = 38).
    assert_eq!(
        serde_json::Value::Array(boxes),
        json!([
            { "x": 0.0, "y": 0.0, "width": 100.0, "height": 38.0 },
            { "x": 0.0, "y": 0.0, "width": 100.0, "height": 10.0 },
            { "x": 0.0, "y": 0.0, "width": 100.0, "height": 10.0 },
            { "x": 0.0, "y": 15.0, "width": 100.0, "height": 23.0 },
            { "x": 0.0, "y": 18.0, "width": 100.0, "height": 20.0 },
        ])
    );
}
