//! Render sync: the seam between the rig and whatever draws it.
//!
//! The rig never owns renderable objects. It holds opaque [`ProxyId`]s issued
//! by a [`ProxyFactory`] and pushes world matrices through a [`RenderSink`].

use crate::blueprint::{MaterialId, ShapePrimitive};
use crate::limb::{Limb, LimbId};
use crate::transform::{Transform, to_matrix};
use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Opaque handle to a renderable object owned by the render layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxyId(pub u32);

/// Receives world matrices for renderable proxies.
pub trait RenderSink {
    fn set_world_transform(&mut self, proxy: ProxyId, world: DMat4);
}

/// Creates a renderable proxy for a shape and material.
pub trait ProxyFactory {
    fn create_proxy(&mut self, shape: &ShapePrimitive, material: MaterialId) -> ProxyId;
}

/// A world matrix decomposed the way scene-graph renderers store it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: DVec3,
    pub orientation: DQuat,
    pub scale: DVec3,
}

impl Placement {
    pub fn from_matrix(world: &DMat4) -> Self {
        let (scale, orientation, position) = world.to_scale_rotation_translation();
        Self {
            position,
            orientation,
            scale,
        }
    }
}

/// What a mutation pushed to the render layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of limbs whose proxy received a new matrix.
    pub synced: usize,
    /// Limbs that were updated logically but have no proxy to draw them.
    pub missing_proxy: Vec<LimbId>,
}

impl SyncReport {
    pub fn merge(&mut self, other: SyncReport) {
        self.synced += other.synced;
        self.missing_proxy.extend(other.missing_proxy);
    }

    /// `true` when every touched limb reached its proxy.
    pub fn is_complete(&self) -> bool {
        self.missing_proxy.is_empty()
    }
}

/// Writes `world` to the limb's proxy, or records that it has none.
pub(crate) fn sync_limb<S: RenderSink + ?Sized>(
    id: LimbId,
    limb: &Limb,
    world: &Transform,
    sink: &mut S,
    report: &mut SyncReport,
) {
    match limb.proxy() {
        Some(proxy) => {
            sink.set_world_transform(proxy, to_matrix(world));
            report.synced += 1;
        }
        None => {
            log::warn!("limb `{}` has no render proxy, skipping sync", limb.name());
            report.missing_proxy.push(id);
        }
    }
}

/// One renderable object held by a [`HeadlessScene`].
#[derive(Clone, Debug, PartialEq)]
pub struct SceneProxy {
    pub shape: ShapePrimitive,
    pub material_id: MaterialId,
    pub world: DMat4,
    pub placement: Placement,
    /// How many times the matrix has been written.
    pub updates: usize,
}

/// An in-memory render layer: hands out proxies and stores what it is sent.
#[derive(Clone, Debug, Default)]
pub struct HeadlessScene {
    proxies: Vec<SceneProxy>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, proxy: ProxyId) -> Option<&SceneProxy> {
        self.proxies.get(proxy.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProxyId, &SceneProxy)> {
        self.proxies
            .iter()
            .enumerate()
            .map(|(idx, proxy)| (ProxyId(idx as u32), proxy))
    }
}

impl ProxyFactory for HeadlessScene {
    fn create_proxy(&mut self, shape: &ShapePrimitive, material: MaterialId) -> ProxyId {
        let id = ProxyId(self.proxies.len() as u32);
        self.proxies.push(SceneProxy {
            shape: *shape,
            material_id: material,
            world: DMat4::IDENTITY,
            placement: Placement::from_matrix(&DMat4::IDENTITY),
            updates: 0,
        });
        id
    }
}

impl RenderSink for HeadlessScene {
    fn set_world_transform(&mut self, proxy: ProxyId, world: DMat4) {
        match self.proxies.get_mut(proxy.0 as usize) {
            Some(entry) => {
                entry.world = world;
                entry.placement = Placement::from_matrix(&world);
                entry.updates += 1;
            }
            None => log::warn!("headless scene has no proxy {}", proxy.0),
        }
    }
}
