//! A single node of the kinematic tree.

use crate::blueprint::{LimbSpec, MaterialId, ShapePrimitive};
use crate::render::ProxyId;
use crate::transform::{Axis, AxisSet, Transform, identity, rotate_about, rotation_matrix, translate};
use glam::DVec3;
use id_arena::Id;

/// Handle of a limb inside its [`Skeleton`](crate::Skeleton) arena.
pub type LimbId = Id<Limb>;

/// A rigid part of the rig.
///
/// A limb's placement relative to its parent is `local ∘ rest`:
/// `rest` is the fixed attachment (offset and stretch) and `local` the
/// accumulated user edits on top of it. `local` is only ever built from
/// translations and rotations, so its linear part stays orthonormal.
#[derive(Clone, Debug)]
pub struct Limb {
    name: String,
    rest: Transform,
    anchor: DVec3,
    local: Transform,
    heading: DVec3,
    allowed_axes: AxisSet,
    shape: ShapePrimitive,
    material_id: MaterialId,
    pub(crate) parent: Option<LimbId>,
    pub(crate) children: Vec<LimbId>,
    proxy: Option<ProxyId>,
}

impl Limb {
    pub(crate) fn from_spec(spec: LimbSpec, proxy: Option<ProxyId>) -> Self {
        let rest = spec.rest_transform();
        Self {
            name: spec.name,
            anchor: spec.offset,
            rest,
            local: identity(),
            heading: spec.heading.normalize_or(DVec3::Z),
            allowed_axes: spec.allowed_axes,
            shape: spec.shape,
            material_id: spec.material_id,
            parent: None,
            children: Vec::new(),
            proxy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fixed attachment transform, set at build time.
    pub fn rest(&self) -> &Transform {
        &self.rest
    }

    /// Attachment point in the parent's frame; the pivot of every rotation.
    pub fn anchor(&self) -> DVec3 {
        self.anchor
    }

    /// Accumulated user edits relative to the rest pose.
    pub fn local(&self) -> &Transform {
        &self.local
    }

    /// Current facing in the parent's frame.
    pub fn heading(&self) -> DVec3 {
        self.heading
    }

    pub fn allowed_axes(&self) -> AxisSet {
        self.allowed_axes
    }

    pub fn shape(&self) -> &ShapePrimitive {
        &self.shape
    }

    pub fn material_id(&self) -> MaterialId {
        self.material_id
    }

    pub fn parent(&self) -> Option<LimbId> {
        self.parent
    }

    /// Children in attach order, which is also the propagation order.
    pub fn children(&self) -> &[LimbId] {
        &self.children
    }

    pub fn proxy(&self) -> Option<ProxyId> {
        self.proxy
    }

    /// `local ∘ rest`: this limb's contribution to every world transform below it.
    pub fn pose(&self) -> Transform {
        self.local * self.rest
    }

    /// Rotates about the limb's own `axis` through its anchor.
    ///
    /// The anchor maps to the same parent-frame point before and after, so the
    /// limb turns in place. The heading follows the rotation.
    pub(crate) fn pivot(&mut self, angle: f64, axis: Axis) {
        let frame = self.local.matrix3;
        self.local = self.local * rotate_about(angle, axis, self.anchor);
        self.heading = frame * rotation_matrix(angle, axis) * frame.inverse() * self.heading;
    }

    /// Moves the limb `speed` units along its heading, in the parent's frame.
    pub(crate) fn advance(&mut self, speed: f64) {
        self.local = translate(self.heading * speed) * self.local;
    }
}
