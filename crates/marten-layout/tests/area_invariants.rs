//! Constrained-geometry invariants.
//!
//! An area's axis admits exactly two of {near edge, far edge, size}; the
//! third is always an error, whatever the order of the sets. Resolution is
//! strictly parent-before-child and exactly once.

use marten_layout::{Areas, LayoutError, Rect};
use marten_style::{
    LogicalSide, PhysicalAxis, PhysicalSide, WritingMode,
};

/// One constraint-fixing operation on the horizontal axis.
#[derive(Clone, Copy, Debug)]
enum Op {
    Left(f32),
    Right(f32),
    Width(f32),
}

fn apply(areas: &mut Areas, id: marten_layout::AreaId, op: Op) -> Result<(), LayoutError> {
    match op {
        Op::Left(v) => areas.set_edge(id, PhysicalSide::Left, v),
        Op::Right(v) => areas.set_edge(id, PhysicalSide::Right, v),
        Op::Width(v) => areas.set_size(id, PhysicalAxis::Horizontal, v),
    }
}

#[test]
fn third_horizontal_constraint_fails_in_every_order() {
    let ops = [Op::Left(1.0), Op::Right(2.0), Op::Width(3.0)];
    // All six orders of (left, right, width): two fix, the third errors.
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    for order in orders {
        let mut areas = Areas::default();
        let id = areas.alloc(None);
        apply(&mut areas, id, ops[order[0]]).expect("first constraint fixes");
        apply(&mut areas, id, ops[order[1]]).expect("second constraint fixes");
        let err = apply(&mut areas, id, ops[order[2]]).expect_err("third must over-constrain");
        assert!(
            matches!(err, LayoutError::OverConstrained { area, .. } if area == id),
            "unexpected error {err:?} for order {order:?}"
        );
    }
}

#[test]
fn re_fixing_the_same_constraint_overwrites() {
    let mut areas = Areas::default();
    let parent = areas.alloc_resolved(Rect::new(0.0, 0.0, 100.0, 100.0));
    let id = areas.alloc(Some(parent));
    areas.set_edge(id, PhysicalSide::Left, 1.0).unwrap();
    areas.set_edge(id, PhysicalSide::Left, 4.0).unwrap();
    areas.set_size(id, PhysicalAxis::Horizontal, 10.0).unwrap();
    areas.set_edge(id, PhysicalSide::Top, 0.0).unwrap();
    areas.set_size(id, PhysicalAxis::Vertical, 5.0).unwrap();
    areas.resolve(id).unwrap();
    assert_eq!(areas.get(id).rect().x, 4.0);
}

#[test]
fn size_derives_from_parent_through_both_edges() {
    let mut areas = Areas::default();
    let parent = areas.alloc_resolved(Rect::new(0.0, 0.0, 100.0, 50.0));
    let id = areas.alloc(Some(parent));
    areas.set_edge(id, PhysicalSide::Left, 10.0).unwrap();
    areas.set_edge(id, PhysicalSide::Right, 20.0).unwrap();
    assert_eq!(areas.size(id, PhysicalAxis::Horizontal).unwrap(), 70.0);

    // The vertical axis has nothing to derive from.
    let err = areas.size(id, PhysicalAxis::Vertical).unwrap_err();
    assert!(matches!(err, LayoutError::UnderDetermined { area } if area == id));
}

#[test]
fn far_edge_anchors_to_the_parent_far_side() {
    let mut areas = Areas::default();
    let parent = areas.alloc_resolved(Rect::new(0.0, 0.0, 100.0, 50.0));
    let id = areas.alloc(Some(parent));
    areas.set_edge(id, PhysicalSide::Right, 20.0).unwrap();
    areas.set_size(id, PhysicalAxis::Horizontal, 30.0).unwrap();
    areas.set_edge(id, PhysicalSide::Top, 5.0).unwrap();
    areas.set_size(id, PhysicalAxis::Vertical, 10.0).unwrap();
    areas.resolve(id).unwrap();

    let rect = areas.get(id).rect();
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (50.0, 5.0, 30.0, 10.0));
}

#[test]
fn resolve_requires_a_resolved_parent() {
    let mut areas = Areas::default();
    let orphan = areas.alloc(None);
    assert!(matches!(
        areas.resolve(orphan),
        Err(LayoutError::ParentUnresolved { .. })
    ));

    let parent = areas.alloc(None);
    let child = areas.alloc(Some(parent));
    areas.set_edge(child, PhysicalSide::Left, 0.0).unwrap();
    areas.set_size(child, PhysicalAxis::Horizontal, 1.0).unwrap();
    areas.set_edge(child, PhysicalSide::Top, 0.0).unwrap();
    areas.set_size(child, PhysicalAxis::Vertical, 1.0).unwrap();
    assert!(matches!(
        areas.resolve(child),
        Err(LayoutError::ParentUnresolved { .. })
    ));
}

#[test]
fn resolve_requires_completeness_and_rejects_repeats() {
    let mut areas = Areas::default();
    let parent = areas.alloc_resolved(Rect::new(0.0, 0.0, 100.0, 50.0));
    let id = areas.alloc(Some(parent));
    areas.set_edge(id, PhysicalSide::Left, 0.0).unwrap();
    areas.set_size(id, PhysicalAxis::Horizontal, 10.0).unwrap();
    areas.set_edge(id, PhysicalSide::Top, 0.0).unwrap();

    // Only three of four constraints fixed.
    assert!(matches!(
        areas.resolve(id),
        Err(LayoutError::Incomplete { .. })
    ));

    areas.set_size(id, PhysicalAxis::Vertical, 5.0).unwrap();
    areas.resolve(id).unwrap();
    let first = areas.get(id).rect();

    // A second resolution attempt is rejected and the stored geometry is
    // untouched.
    assert!(matches!(
        areas.resolve(id),
        Err(LayoutError::AlreadyResolved { .. })
    ));
    assert_eq!(areas.get(id).rect(), first);
}

#[test]
fn logical_sets_honor_the_same_invariants_per_writing_mode() {
    for wm in [
        WritingMode::HorizontalTb,
        WritingMode::VerticalLr,
        WritingMode::VerticalRl,
    ] {
        let mut areas = Areas::default();
        let id = areas.alloc(None);
        let block_axis = wm.physical_axis(marten_style::LogicalAxis::Block);

        areas
            .set_edge(id, wm.physical_side(LogicalSide::BlockStart), 1.0)
            .unwrap();
        areas
            .set_edge(id, wm.physical_side(LogicalSide::BlockEnd), 2.0)
            .unwrap();
        let err = areas.set_size(id, block_axis, 3.0).expect_err("over-constrained");
        assert!(matches!(err, LayoutError::OverConstrained { .. }), "mode {wm:?}");

        // The inline axis is independent and still accepts two constraints.
        areas
            .set_edge(id, wm.physical_side(LogicalSide::InlineStart), 0.0)
            .unwrap();
        areas
            .set_size(id, wm.physical_axis(marten_style::LogicalAxis::Inline), 5.0)
            .unwrap();
    }
}

#[test]
fn vertical_rl_block_start_lands_on_the_right_edge() {
    let mut areas = Areas::default();
    let parent = areas.alloc_resolved(Rect::new(0.0, 0.0, 200.0, 100.0));
    let id = areas.alloc(Some(parent));
    let wm = WritingMode::VerticalRl;

    areas
        .set_edge(id, wm.physical_side(LogicalSide::BlockStart), 10.0)
        .unwrap();
    areas
        .set_size(id, wm.physical_axis(marten_style::LogicalAxis::Block), 30.0)
        .unwrap();
    areas
        .set_edge(id, wm.physical_side(LogicalSide::InlineStart), 0.0)
        .unwrap();
    areas
        .set_size(id, wm.physical_axis(marten_style::LogicalAxis::Inline), 100.0)
        .unwrap();
    areas.resolve(id).unwrap();

    // Block offset 10 from the right edge, 30 wide: x = 200 − 10 − 30.
    let rect = areas.get(id).rect();
    assert_eq!((rect.x, rect.width), (160.0, 30.0));
}
