use crate::transform::{AxisSet, Transform, scale, translate};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A generic material identifier referencing an external palette.
pub type MaterialId = u8;

/// Supported geometric primitives for robot segments.
///
/// The shape is handed to the render layer as-is; the rig never inspects it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ShapePrimitive {
    /// A box defined by half-extents (x, y, z).
    Box(DVec3),
    /// A cylinder defined by radius and height (aligned along Y axis).
    Cylinder { radius: f64, height: f64 },
    /// A sphere defined by radius.
    Sphere(f64),
    /// A capsule defined by radius and height (aligned along Y axis).
    Capsule { radius: f64, height: f64 },
}

/// Declared geometry of a single limb, consumed by
/// [`SkeletonBuilder::add_limb`](crate::SkeletonBuilder::add_limb).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LimbSpec {
    /// Unique name, used for lookups and diagnostics.
    pub name: String,

    /// Attachment point in the parent's local frame (world frame for the root).
    pub offset: DVec3,

    /// Fixed rescale of the limb's local frame. Inherited by children.
    pub stretch: DVec3,

    /// Axes the limb may be rotated about.
    pub allowed_axes: AxisSet,

    /// Initial facing, in the parent's frame. Used by heading moves and look-at.
    pub heading: DVec3,

    /// The shape the render layer should draw for this limb.
    pub shape: ShapePrimitive,

    /// Material ID for visual rendering (links to external palette).
    pub material_id: MaterialId,
}

impl LimbSpec {
    /// A limb at its parent's origin, facing +Z, with no rotation allowed.
    pub fn new(name: impl Into<String>, shape: ShapePrimitive) -> Self {
        Self {
            name: name.into(),
            offset: DVec3::ZERO,
            stretch: DVec3::ONE,
            allowed_axes: AxisSet::NONE,
            heading: DVec3::Z,
            shape,
            material_id: 0,
        }
    }

    pub fn with_offset(mut self, offset: DVec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_stretch(mut self, stretch: DVec3) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn with_axes(mut self, allowed_axes: AxisSet) -> Self {
        self.allowed_axes = allowed_axes;
        self
    }

    pub fn with_heading(mut self, heading: DVec3) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_material(mut self, material_id: MaterialId) -> Self {
        self.material_id = material_id;
        self
    }

    /// The rest pose: stretch in place, then move to the attachment point.
    pub fn rest_transform(&self) -> Transform {
        translate(self.offset) * scale(self.stretch)
    }
}
