//! Constrained box geometry.
//!
//! [§ 8.1 Box dimensions](https://www.w3.org/TR/CSS2/box.html#box-dimensions)
//!
//! Layout rarely knows a rectangle outright; it learns edges and sizes
//! piecemeal as the box-model passes run ("the left edge sits 5px into the
//! containing block", "the block size is 40px"). An [`Area`] accumulates
//! those partial constraints per axis and is *resolved* to absolute
//! coordinates once its parent is — strictly parent-before-child.
//!
//! Each axis admits exactly two of its three constraints {near edge, far
//! edge, size}; the representation is a closed enum per axis, so a third
//! constraint is rejected at set time, close to the bug that produced it,
//! and an over-determined axis is unrepresentable. Resolution is a pure
//! function of (axis constraints, parent rectangle).
//!
//! Areas live in an arena ([`Areas`]); identity is the arena index and the
//! parent link is a plain index, never a second owner.

use serde::Serialize;

use marten_style::{PhysicalAxis, PhysicalSide};

use crate::error::LayoutError;

/// Identity of an area: its index in the [`Areas`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AreaId(pub usize);

/// An absolute, resolved rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// A new rectangle.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// The origin coordinate along an axis.
    #[must_use]
    pub fn origin(&self, axis: PhysicalAxis) -> f32 {
        match axis {
            PhysicalAxis::Horizontal => self.x,
            PhysicalAxis::Vertical => self.y,
        }
    }

    /// The extent along an axis.
    #[must_use]
    pub fn size(&self, axis: PhysicalAxis) -> f32 {
        match axis {
            PhysicalAxis::Horizontal => self.width,
            PhysicalAxis::Vertical => self.height,
        }
    }
}

/// The constraints fixed so far on one axis of an area.
///
/// The near edge is the one closer to the coordinate origin (left or top),
/// the far edge the opposite one (right or bottom). At most two of the
/// three quantities may be fixed; the enum has no three-constraint state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum AxisSpec {
    /// Nothing known yet.
    #[default]
    Unset,
    /// Only the near edge offset is fixed.
    Near(f32),
    /// Only the far edge offset is fixed.
    Far(f32),
    /// Only the size is fixed.
    Size(f32),
    /// Near and far edges fixed; size is implied by the parent.
    NearFar(f32, f32),
    /// Near edge and size fixed.
    NearSize(f32, f32),
    /// Far edge and size fixed.
    FarSize(f32, f32),
}

impl AxisSpec {
    /// Number of constraints currently fixed.
    fn count(self) -> u8 {
        match self {
            AxisSpec::Unset => 0,
            AxisSpec::Near(_) | AxisSpec::Far(_) | AxisSpec::Size(_) => 1,
            AxisSpec::NearFar(..) | AxisSpec::NearSize(..) | AxisSpec::FarSize(..) => 2,
        }
    }

    fn is_complete(self) -> bool {
        self.count() == 2
    }

    /// Fix the near edge. Re-fixing an already-set near edge overwrites
    /// it; fixing it while far edge and size are both set is the
    /// over-constraint error (reported by the caller with the area id).
    fn set_near(&mut self, v: f32) -> Result<(), ()> {
        *self = match *self {
            AxisSpec::Unset | AxisSpec::Near(_) => AxisSpec::Near(v),
            AxisSpec::Far(far) | AxisSpec::NearFar(_, far) => AxisSpec::NearFar(v, far),
            AxisSpec::Size(size) | AxisSpec::NearSize(_, size) => AxisSpec::NearSize(v, size),
            AxisSpec::FarSize(..) => return Err(()),
        };
        Ok(())
    }

    /// Fix the far edge; same overwrite/over-constraint rules as
    /// [`AxisSpec::set_near`].
    fn set_far(&mut self, v: f32) -> Result<(), ()> {
        *self = match *self {
            AxisSpec::Unset | AxisSpec::Far(_) => AxisSpec::Far(v),
            AxisSpec::Near(near) | AxisSpec::NearFar(near, _) => AxisSpec::NearFar(near, v),
            AxisSpec::Size(size) | AxisSpec::FarSize(_, size) => AxisSpec::FarSize(v, size),
            AxisSpec::NearSize(..) => return Err(()),
        };
        Ok(())
    }

    /// Fix the size; same overwrite/over-constraint rules as
    /// [`AxisSpec::set_near`].
    fn set_size(&mut self, v: f32) -> Result<(), ()> {
        *self = match *self {
            AxisSpec::Unset | AxisSpec::Size(_) => AxisSpec::Size(v),
            AxisSpec::Near(near) | AxisSpec::NearSize(near, _) => AxisSpec::NearSize(near, v),
            AxisSpec::Far(far) | AxisSpec::FarSize(far, _) => AxisSpec::FarSize(far, v),
            AxisSpec::NearFar(..) => return Err(()),
        };
        Ok(())
    }

    fn near(self) -> Option<f32> {
        match self {
            AxisSpec::Near(n) | AxisSpec::NearFar(n, _) | AxisSpec::NearSize(n, _) => Some(n),
            _ => None,
        }
    }

    fn far(self) -> Option<f32> {
        match self {
            AxisSpec::Far(f) | AxisSpec::NearFar(_, f) | AxisSpec::FarSize(f, _) => Some(f),
            _ => None,
        }
    }

    fn size_constraint(self) -> Option<f32> {
        match self {
            AxisSpec::Size(s) | AxisSpec::NearSize(_, s) | AxisSpec::FarSize(_, s) => Some(s),
            _ => None,
        }
    }
}

/// A rectangle under construction: partial per-axis constraints, a parent
/// link, and — once resolved — absolute coordinates.
#[derive(Debug, Clone, Default)]
pub struct Area {
    parent: Option<AreaId>,
    horizontal: AxisSpec,
    vertical: AxisSpec,
    rect: Rect,
    resolved: bool,
}

impl Area {
    fn axis(&self, axis: PhysicalAxis) -> AxisSpec {
        match axis {
            PhysicalAxis::Horizontal => self.horizontal,
            PhysicalAxis::Vertical => self.vertical,
        }
    }

    fn axis_mut(&mut self, axis: PhysicalAxis) -> &mut AxisSpec {
        match axis {
            PhysicalAxis::Horizontal => &mut self.horizontal,
            PhysicalAxis::Vertical => &mut self.vertical,
        }
    }

    /// True once [`Areas::resolve`] has produced absolute coordinates.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// True iff both axes carry exactly two constraints (four of the six
    /// specification fields are fixed).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.horizontal.is_complete() && self.vertical.is_complete()
    }

    /// The resolved rectangle; meaningful only after resolution.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The parent area this one resolves against.
    #[must_use]
    pub fn parent(&self) -> Option<AreaId> {
        self.parent
    }
}

/// Arena of areas; hands out stable [`AreaId`] indices at insertion time.
#[derive(Debug, Default)]
pub struct Areas {
    list: Vec<Area>,
}

impl Areas {
    /// Allocate an unconstrained area with the given parent.
    pub fn alloc(&mut self, parent: Option<AreaId>) -> AreaId {
        let id = AreaId(self.list.len());
        self.list.push(Area {
            parent,
            ..Area::default()
        });
        id
    }

    /// Allocate an already-resolved area from an absolute rectangle.
    ///
    /// Used for the initial containing block: the viewport is known
    /// outright and everything else resolves against it.
    pub fn alloc_resolved(&mut self, rect: Rect) -> AreaId {
        let id = AreaId(self.list.len());
        self.list.push(Area {
            parent: None,
            horizontal: AxisSpec::NearSize(0.0, rect.width),
            vertical: AxisSpec::NearSize(0.0, rect.height),
            rect,
            resolved: true,
        });
        id
    }

    /// Borrow an area.
    #[must_use]
    pub fn get(&self, id: AreaId) -> &Area {
        &self.list[id.0]
    }

    /// Re-parent an area (containing-block assignment).
    pub fn set_parent(&mut self, id: AreaId, parent: AreaId) {
        self.list[id.0].parent = Some(parent);
    }

    /// Fix one physical edge of an area.
    ///
    /// The edge offset is measured inward from the parent's matching edge.
    ///
    /// # Errors
    ///
    /// [`LayoutError::OverConstrained`] if the axis already has its other
    /// two constraints fixed — the check happens eagerly at set time so the
    /// failure surfaces next to its cause.
    pub fn set_edge(&mut self, id: AreaId, side: PhysicalSide, v: f32) -> Result<(), LayoutError> {
        let spec = self.list[id.0].axis_mut(side.axis());
        let result = if side.is_near() {
            spec.set_near(v)
        } else {
            spec.set_far(v)
        };
        result.map_err(|()| LayoutError::OverConstrained {
            area: id,
            side: side_name(side),
        })
    }

    /// Fix the size of an area along one physical axis.
    ///
    /// # Errors
    ///
    /// [`LayoutError::OverConstrained`] if both edges of that axis are
    /// already fixed.
    pub fn set_size(&mut self, id: AreaId, axis: PhysicalAxis, v: f32) -> Result<(), LayoutError> {
        self.list[id.0]
            .axis_mut(axis)
            .set_size(v)
            .map_err(|()| LayoutError::OverConstrained {
                area: id,
                side: size_name(axis),
            })
    }

    /// The area's size along an axis.
    ///
    /// Before resolution this derives from the size constraint, or from
    /// `parent size − near − far` recursively through the arena; after
    /// resolution it reads the stored value.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnderDetermined`] when neither path can produce a
    /// value.
    pub fn size(&self, id: AreaId, axis: PhysicalAxis) -> Result<f32, LayoutError> {
        let area = &self.list[id.0];
        if area.resolved {
            return Ok(area.rect.size(axis));
        }
        let spec = area.axis(axis);
        if let Some(size) = spec.size_constraint() {
            return Ok(size);
        }
        if let (Some(near), Some(far), Some(parent)) = (spec.near(), spec.far(), area.parent) {
            return Ok(self.size(parent, axis)? - near - far);
        }
        Err(LayoutError::UnderDetermined { area: id })
    }

    /// The area's size along an axis, or `None` when it is not yet
    /// determined. Used where "still undetermined" selects a code path
    /// (auto block sizes) rather than being an error.
    #[must_use]
    pub fn size_if_determined(&self, id: AreaId, axis: PhysicalAxis) -> Option<f32> {
        self.size(id, axis).ok()
    }

    /// Resolve an area to absolute coordinates against its parent.
    ///
    /// Tree order is mandatory: the parent must already be resolved.
    ///
    /// # Errors
    ///
    /// [`LayoutError::ParentUnresolved`] when called out of order,
    /// [`LayoutError::Incomplete`] when fewer than four constraints are
    /// fixed, [`LayoutError::AlreadyResolved`] on a second attempt, and
    /// [`LayoutError::UnderDetermined`] when a needed size cannot be
    /// derived.
    pub fn resolve(&mut self, id: AreaId) -> Result<(), LayoutError> {
        let area = &self.list[id.0];
        if area.resolved {
            return Err(LayoutError::AlreadyResolved { area: id });
        }
        let parent_id = area.parent.ok_or(LayoutError::ParentUnresolved { area: id })?;
        let parent = &self.list[parent_id.0];
        if !parent.resolved {
            return Err(LayoutError::ParentUnresolved { area: id });
        }
        if !area.is_complete() {
            return Err(LayoutError::Incomplete { area: id });
        }
        let parent_rect = parent.rect;

        let width = self.size(id, PhysicalAxis::Horizontal)?;
        let height = self.size(id, PhysicalAxis::Vertical)?;
        let x = Self::resolve_origin(
            self.list[id.0].horizontal,
            parent_rect.x,
            parent_rect.width,
            width,
        );
        let y = Self::resolve_origin(
            self.list[id.0].vertical,
            parent_rect.y,
            parent_rect.height,
            height,
        );

        let area = &mut self.list[id.0];
        area.rect = Rect::new(x, y, width, height);
        area.resolved = true;
        Ok(())
    }

    /// Absolute origin along one axis: near edge anchors to the parent's
    /// origin, a far edge anchors to the parent's far side.
    fn resolve_origin(spec: AxisSpec, parent_origin: f32, parent_size: f32, own_size: f32) -> f32 {
        if let Some(near) = spec.near() {
            parent_origin + near
        } else if let Some(far) = spec.far() {
            parent_origin + parent_size - far - own_size
        } else {
            // Unreachable for complete areas: every two-constraint variant
            // carries at least one edge.
            parent_origin
        }
    }
}

fn side_name(side: PhysicalSide) -> &'static str {
    match side {
        PhysicalSide::Top => "top",
        PhysicalSide::Right => "right",
        PhysicalSide::Bottom => "bottom",
        PhysicalSide::Left => "left",
    }
}

fn size_name(axis: PhysicalAxis) -> &'static str {
    match axis {
        PhysicalAxis::Horizontal => "width",
        PhysicalAxis::Vertical => "height",
    }
}
