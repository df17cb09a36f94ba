//! The kinematic tree: an arena of [`Limb`]s with a single root.
//!
//! World transforms are never cached. Every read walks the ancestor chain and
//! every mutation recomputes the edited subtree top-down before syncing it.

use crate::blueprint::LimbSpec;
use crate::error::{RigError, TreeDefect};
use crate::limb::{Limb, LimbId};
use crate::render::{ProxyId, RenderSink, SyncReport, sync_limb};
use crate::transform::{Axis, Transform, identity, rotate_vector, translate};
use glam::DVec3;
use id_arena::Arena;
use std::collections::HashMap;

/// Below this magnitude a look-at correction is not worth applying.
const ANGLE_EPSILON: f64 = 1e-12;

/// Collects limbs and parent/child edges, then validates them into a [`Skeleton`].
///
/// Nothing is checked until [`build`](Self::build); a builder that produced a
/// malformed topology never yields a usable tree.
#[derive(Debug)]
pub struct SkeletonBuilder {
    limbs: Arena<Limb>,
    edges: Vec<(LimbId, LimbId)>,
}

impl Default for SkeletonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SkeletonBuilder {
    pub fn new() -> Self {
        Self {
            limbs: Arena::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a limb with no render proxy.
    pub fn add_limb(&mut self, spec: LimbSpec) -> LimbId {
        self.limbs.alloc(Limb::from_spec(spec, None))
    }

    /// Adds a limb that drives `proxy`.
    pub fn add_bound_limb(&mut self, spec: LimbSpec, proxy: ProxyId) -> LimbId {
        self.limbs.alloc(Limb::from_spec(spec, Some(proxy)))
    }

    /// Records `child` as the next child of `parent`.
    ///
    /// Children are traversed in the order they were attached.
    pub fn attach(&mut self, parent: LimbId, child: LimbId) -> &mut Self {
        self.edges.push((parent, child));
        self
    }

    /// Wires the recorded edges and checks that they form a single tree.
    pub fn build(self) -> Result<Skeleton, RigError> {
        let Self { mut limbs, edges } = self;

        if limbs.len() == 0 {
            return Err(TreeDefect::Empty.into());
        }

        let mut names = HashMap::with_capacity(limbs.len());
        for (id, limb) in limbs.iter() {
            if names.insert(limb.name().to_owned(), id).is_some() {
                return Err(TreeDefect::DuplicateName(limb.name().to_owned()).into());
            }
        }

        for (parent, child) in edges {
            let parent_name = name_of(&limbs, parent)?;
            let child_name = name_of(&limbs, child)?;

            if parent == child {
                return Err(TreeDefect::SelfAttachment(child_name).into());
            }
            if let Some(existing) = limbs[child].parent {
                return Err(TreeDefect::MultipleParents {
                    child: child_name,
                    first: name_of(&limbs, existing)?,
                    second: parent_name,
                }
                .into());
            }
            if would_create_cycle(&limbs, parent, child) {
                return Err(TreeDefect::Cycle {
                    parent: parent_name,
                    child: child_name,
                }
                .into());
            }

            limbs[child].parent = Some(parent);
            limbs[parent].children.push(child);
        }

        // Edges are acyclic and single-parented, so there is at least one root.
        let roots: Vec<LimbId> = limbs
            .iter()
            .filter(|(_, limb)| limb.parent().is_none())
            .map(|(id, _)| id)
            .collect();
        let root = match roots.as_slice() {
            [] => return Err(TreeDefect::Empty.into()),
            [root] => *root,
            [first, second, ..] => {
                return Err(TreeDefect::MultipleRoots {
                    first: limbs[*first].name().to_owned(),
                    second: limbs[*second].name().to_owned(),
                }
                .into());
            }
        };

        Ok(Skeleton { limbs, root, names })
    }
}

fn name_of(limbs: &Arena<Limb>, id: LimbId) -> Result<String, TreeDefect> {
    limbs
        .get(id)
        .map(|limb| limb.name().to_owned())
        .ok_or_else(|| TreeDefect::ForeignHandle(format!("{id:?}")))
}

/// `true` if `child` is `parent` or one of its ancestors.
fn would_create_cycle(limbs: &Arena<Limb>, parent: LimbId, child: LimbId) -> bool {
    let mut current = Some(parent);
    while let Some(id) = current {
        if id == child {
            return true;
        }
        current = limbs.get(id).and_then(Limb::parent);
    }
    false
}

/// A validated tree of limbs.
#[derive(Debug)]
pub struct Skeleton {
    limbs: Arena<Limb>,
    root: LimbId,
    names: HashMap<String, LimbId>,
}

impl Skeleton {
    pub fn builder() -> SkeletonBuilder {
        SkeletonBuilder::new()
    }

    pub fn root(&self) -> LimbId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.limbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limbs.len() == 0
    }

    pub fn limb(&self, id: LimbId) -> Option<&Limb> {
        self.limbs.get(id)
    }

    pub fn find(&self, name: &str) -> Option<LimbId> {
        self.names.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LimbId, &Limb)> {
        self.limbs.iter()
    }

    /// Every limb below `id`, depth-first in child order. Excludes `id`.
    pub fn descendants(&self, id: LimbId) -> Vec<LimbId> {
        let mut out = Vec::new();
        let mut stack: Vec<LimbId> = match self.limbs.get(id) {
            Some(limb) => limb.children().iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.limbs[current].children().iter().rev().copied());
        }
        out
    }

    /// Composition of `local ∘ rest` for every limb from the root down to `id`.
    pub fn world_transform(&self, id: LimbId) -> Option<Transform> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let limb = self.limbs.get(cur)?;
            chain.push(limb.pose());
            current = limb.parent();
        }
        Some(chain.iter().rev().fold(identity(), |acc, pose| acc * *pose))
    }

    pub fn world_position(&self, id: LimbId) -> Option<DVec3> {
        self.world_transform(id).map(|world| world.translation)
    }

    /// The limb's heading expressed in world space, normalised.
    pub fn world_heading(&self, id: LimbId) -> Option<DVec3> {
        let limb = self.limbs.get(id)?;
        let heading = self.parent_world(limb).transform_vector3(limb.heading());
        Some(heading.normalize_or_zero())
    }

    /// Rotates `id` in place about its own `axis`, then re-syncs its subtree.
    ///
    /// The pivot is the limb's current world anchor, so its world position is
    /// unchanged. Descendants keep their local transforms and follow rigidly.
    pub fn rotate_around_pivot<S: RenderSink + ?Sized>(
        &mut self,
        id: LimbId,
        angle: f64,
        axis: Axis,
        sink: &mut S,
    ) -> Result<SyncReport, RigError> {
        let limb = self.limb_mut(id)?;
        if !limb.allowed_axes().contains(axis) {
            log::warn!(
                "could not rotate `{}` along the {} axis, illegal move",
                limb.name(),
                axis
            );
            return Err(RigError::IllegalAxis {
                limb: limb.name().to_owned(),
                axis,
            });
        }
        limb.pivot(angle, axis);
        Ok(self.sync_subtree(id, sink))
    }

    /// Moves `id` along its current heading, then re-syncs its subtree.
    pub fn translate_along_heading<S: RenderSink + ?Sized>(
        &mut self,
        id: LimbId,
        speed: f64,
        sink: &mut S,
    ) -> Result<SyncReport, RigError> {
        self.limb_mut(id)?.advance(speed);
        Ok(self.sync_subtree(id, sink))
    }

    /// Turns `id` so its heading points at `target` (world space).
    ///
    /// Yaw is applied about Y, then pitch about X, each only if the limb
    /// allows that axis. Aiming is exact when the heading lies in the limb's
    /// local YZ plane.
    pub fn look_at<S: RenderSink + ?Sized>(
        &mut self,
        id: LimbId,
        target: DVec3,
        sink: &mut S,
    ) -> Result<SyncReport, RigError> {
        let limb = self.limbs.get(id).ok_or_else(|| unknown(id))?;
        // The frame rotations are applied in: parent, user edits, then the anchor.
        let joint = self.parent_world(limb) * *limb.local() * translate(limb.anchor());
        let forward = limb.local().matrix3.inverse() * limb.heading();
        let allowed = limb.allowed_axes();

        let mut to_target = joint.inverse().transform_point3(target);
        let mut report = SyncReport::default();
        if to_target.length_squared() < f64::EPSILON {
            return Ok(report);
        }

        if allowed.contains(Axis::Y) {
            let yaw = yaw_of(to_target) - yaw_of(forward);
            if yaw.abs() > ANGLE_EPSILON {
                report.merge(self.rotate_around_pivot(id, yaw, Axis::Y, sink)?);
                to_target = rotate_vector(to_target, -yaw, Axis::Y);
            }
        }
        if allowed.contains(Axis::X) {
            let pitch = pitch_of(to_target) - pitch_of(forward);
            if pitch.abs() > ANGLE_EPSILON {
                report.merge(self.rotate_around_pivot(id, pitch, Axis::X, sink)?);
            }
        }
        Ok(report)
    }

    /// Pushes every limb's world transform, e.g. for the initial pose.
    pub fn sync_all<S: RenderSink + ?Sized>(&self, sink: &mut S) -> SyncReport {
        self.sync_subtree(self.root, sink)
    }

    fn sync_subtree<S: RenderSink + ?Sized>(&self, id: LimbId, sink: &mut S) -> SyncReport {
        let mut report = SyncReport::default();
        if let Some(limb) = self.limbs.get(id) {
            let parent_world = self.parent_world(limb);
            self.sync_recursive(id, &parent_world, sink, &mut report);
        }
        report
    }

    fn sync_recursive<S: RenderSink + ?Sized>(
        &self,
        id: LimbId,
        parent_world: &Transform,
        sink: &mut S,
        report: &mut SyncReport,
    ) {
        let limb = &self.limbs[id];
        let world = *parent_world * limb.pose();
        sync_limb(id, limb, &world, sink, report);
        for &child in limb.children() {
            self.sync_recursive(child, &world, sink, report);
        }
    }

    fn parent_world(&self, limb: &Limb) -> Transform {
        limb.parent()
            .and_then(|parent| self.world_transform(parent))
            .unwrap_or_else(identity)
    }

    fn limb_mut(&mut self, id: LimbId) -> Result<&mut Limb, RigError> {
        self.limbs.get_mut(id).ok_or_else(|| unknown(id))
    }
}

fn unknown(id: LimbId) -> RigError {
    RigError::UnknownLimb(format!("{id:?}"))
}

/// Rotation about Y that takes +Z onto `v`'s horizontal direction.
fn yaw_of(v: DVec3) -> f64 {
    v.x.atan2(v.z)
}

/// Rotation about X that raises a horizontal vector to `v`'s elevation.
fn pitch_of(v: DVec3) -> f64 {
    (-v.y).atan2(v.x.hypot(v.z))
}
