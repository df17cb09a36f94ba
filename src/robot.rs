//! The fixed robot topology: torso, head, two arms and two legs.
//!
//! Configure the geometry with a [`RobotGeometry`], then call
//! [`Robot::build`] with a [`ProxyFactory`] to get a rig whose limbs are
//! addressed by [`LimbRole`] instead of by name.

use crate::blueprint::{LimbSpec, MaterialId, ShapePrimitive};
use crate::error::RigError;
use crate::limb::LimbId;
use crate::render::{ProxyFactory, RenderSink, SyncReport};
use crate::skeleton::Skeleton;
use crate::transform::{Axis, AxisSet};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The parts of the robot, in selection order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimbRole {
    Torso,
    Head,
    LeftArm,
    LeftForearm,
    LeftHand,
    RightArm,
    RightForearm,
    RightHand,
    LeftLeg,
    LeftShin,
    LeftFoot,
    RightLeg,
    RightShin,
    RightFoot,
}

impl LimbRole {
    pub const ALL: [LimbRole; 14] = [
        Self::Torso,
        Self::Head,
        Self::LeftArm,
        Self::LeftForearm,
        Self::LeftHand,
        Self::RightArm,
        Self::RightForearm,
        Self::RightHand,
        Self::LeftLeg,
        Self::LeftShin,
        Self::LeftFoot,
        Self::RightLeg,
        Self::RightShin,
        Self::RightFoot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Torso => "torso",
            Self::Head => "head",
            Self::LeftArm => "left_arm",
            Self::LeftForearm => "left_forearm",
            Self::LeftHand => "left_hand",
            Self::RightArm => "right_arm",
            Self::RightForearm => "right_forearm",
            Self::RightHand => "right_hand",
            Self::LeftLeg => "left_leg",
            Self::LeftShin => "left_shin",
            Self::LeftFoot => "left_foot",
            Self::RightLeg => "right_leg",
            Self::RightShin => "right_shin",
            Self::RightFoot => "right_foot",
        }
    }

    /// The part this one hangs from; `None` for the torso.
    pub fn parent(self) -> Option<LimbRole> {
        match self {
            Self::Torso => None,
            Self::Head | Self::LeftArm | Self::RightArm | Self::LeftLeg | Self::RightLeg => {
                Some(Self::Torso)
            }
            Self::LeftForearm => Some(Self::LeftArm),
            Self::LeftHand => Some(Self::LeftForearm),
            Self::RightForearm => Some(Self::RightArm),
            Self::RightHand => Some(Self::RightForearm),
            Self::LeftShin => Some(Self::LeftLeg),
            Self::LeftFoot => Some(Self::LeftShin),
            Self::RightShin => Some(Self::RightLeg),
            Self::RightFoot => Some(Self::RightShin),
        }
    }

    pub fn allowed_axes(self) -> AxisSet {
        match self {
            Self::Torso => AxisSet::Y,
            Self::Head | Self::LeftHand | Self::RightHand => AxisSet::X.union(AxisSet::Y),
            Self::LeftArm | Self::RightArm | Self::LeftLeg | Self::RightLeg => {
                AxisSet::X.union(AxisSet::Z)
            }
            Self::LeftForearm
            | Self::RightForearm
            | Self::LeftShin
            | Self::RightShin
            | Self::LeftFoot
            | Self::RightFoot => AxisSet::X,
        }
    }

    /// The axis the left/right keys turn this part about.
    pub fn swing_axis(self) -> Axis {
        match self {
            Self::LeftArm | Self::RightArm | Self::LeftLeg | Self::RightLeg => Axis::Z,
            _ => Axis::Y,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LimbRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LimbRole {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.name() == s)
            .ok_or_else(|| RigError::UnknownLimb(s.to_owned()))
    }
}

/// Dimensions of the robot. Offsets are expressed in the parent's frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotGeometry {
    /// World position of the torso centre.
    pub torso_position: DVec3,
    pub torso_height: f64,
    pub torso_radius: f64,
    pub head_radius: f64,
    pub arm_radius: f64,
    pub forearm_radius: f64,
    pub hand_radius: f64,
    pub leg_radius: f64,
    pub shin_radius: f64,
    pub foot_radius: f64,
    /// Shoulder to elbow.
    pub arm_length: f64,
    /// Elbow to wrist.
    pub forearm_length: f64,
    /// Hip to knee.
    pub leg_length: f64,
    /// Knee to ankle.
    pub shin_length: f64,
    pub material_id: MaterialId,
}

impl Default for RobotGeometry {
    fn default() -> Self {
        Self {
            torso_position: DVec3::new(0.0, 4.0, 0.0),
            torso_height: 1.5,
            torso_radius: 0.75,
            head_radius: 0.32,
            arm_radius: 0.35,
            forearm_radius: 0.20,
            hand_radius: 0.25,
            leg_radius: 0.40,
            shin_radius: 0.25,
            foot_radius: 0.25,
            arm_length: 1.2,
            forearm_length: 1.0,
            leg_length: 1.4,
            shin_length: 1.4,
            material_id: 0,
        }
    }
}

impl RobotGeometry {
    /// Declared geometry of one part.
    pub fn limb_spec(&self, role: LimbRole) -> LimbSpec {
        let half_height = self.torso_height / 2.0;
        let shoulder = DVec3::new(1.5 * self.torso_radius, half_height - self.arm_radius, 0.0);
        let hip = DVec3::new(0.5 * self.torso_radius, -half_height, 0.0);
        let mirror = DVec3::new(-1.0, 1.0, 1.0);
        let elbow = DVec3::new(0.0, -self.arm_length, 0.0);
        let wrist = DVec3::new(0.0, -self.forearm_length, 0.0);
        let knee = DVec3::new(0.0, -self.leg_length, 0.0);
        let ankle = DVec3::new(0.0, -self.shin_length, self.foot_radius * 0.6);
        let hand_stretch = DVec3::new(1.0, 1.2, 0.6);
        let foot_stretch = DVec3::new(1.0, 0.5, 1.6);

        let (offset, stretch, shape) = match role {
            LimbRole::Torso => (
                self.torso_position,
                DVec3::ONE,
                ShapePrimitive::Box(DVec3::new(
                    self.torso_radius,
                    half_height,
                    self.torso_radius / 2.0,
                )),
            ),
            LimbRole::Head => (
                DVec3::new(0.0, half_height + self.head_radius, 0.0),
                DVec3::ONE,
                ShapePrimitive::Box(DVec3::new(
                    self.head_radius,
                    self.head_radius / 2.0,
                    self.head_radius / 2.0,
                )),
            ),
            LimbRole::LeftArm | LimbRole::RightArm => (
                if role == LimbRole::LeftArm { shoulder } else { shoulder * mirror },
                DVec3::ONE,
                capsule(self.arm_radius, self.arm_length),
            ),
            LimbRole::LeftForearm | LimbRole::RightForearm => (
                elbow,
                DVec3::ONE,
                capsule(self.forearm_radius, self.forearm_length),
            ),
            LimbRole::LeftHand | LimbRole::RightHand => (
                wrist,
                hand_stretch,
                ShapePrimitive::Sphere(self.hand_radius),
            ),
            LimbRole::LeftLeg | LimbRole::RightLeg => (
                if role == LimbRole::LeftLeg { hip } else { hip * mirror },
                DVec3::ONE,
                capsule(self.leg_radius, self.leg_length),
            ),
            LimbRole::LeftShin | LimbRole::RightShin => (
                knee,
                DVec3::ONE,
                capsule(self.shin_radius, self.shin_length),
            ),
            LimbRole::LeftFoot | LimbRole::RightFoot => (
                ankle,
                foot_stretch,
                ShapePrimitive::Sphere(self.foot_radius),
            ),
        };

        LimbSpec::new(role.name(), shape)
            .with_offset(offset)
            .with_stretch(stretch)
            .with_axes(role.allowed_axes())
            .with_material(self.material_id)
    }
}

fn capsule(radius: f64, length: f64) -> ShapePrimitive {
    ShapePrimitive::Capsule {
        radius,
        height: (length - 2.0 * radius).max(0.0),
    }
}

/// The assembled robot: a [`Skeleton`] plus role handles resolved once at build time.
#[derive(Debug)]
pub struct Robot {
    skeleton: Skeleton,
    handles: Vec<LimbId>,
}

impl Robot {
    /// Builds the robot, asking `factory` for one proxy per part.
    pub fn build<F: ProxyFactory + ?Sized>(
        geometry: &RobotGeometry,
        factory: &mut F,
    ) -> Result<Self, RigError> {
        Self::assemble(geometry, Some(factory))
    }

    /// Builds the robot without render proxies. Every sync reports the parts as missing.
    pub fn build_logical(geometry: &RobotGeometry) -> Result<Self, RigError> {
        Self::assemble::<crate::render::HeadlessScene>(geometry, None)
    }

    fn assemble<F: ProxyFactory + ?Sized>(
        geometry: &RobotGeometry,
        mut factory: Option<&mut F>,
    ) -> Result<Self, RigError> {
        let mut builder = Skeleton::builder();
        let handles: Vec<LimbId> = LimbRole::ALL
            .into_iter()
            .map(|role| {
                let spec = geometry.limb_spec(role);
                match factory.as_deref_mut() {
                    Some(factory) => {
                        let proxy = factory.create_proxy(&spec.shape, spec.material_id);
                        builder.add_bound_limb(spec, proxy)
                    }
                    None => builder.add_limb(spec),
                }
            })
            .collect();

        for role in LimbRole::ALL {
            if let Some(parent) = role.parent() {
                builder.attach(handles[parent.index()], handles[role.index()]);
            }
        }

        let skeleton = builder.build()?;
        log::info!("built robot rig with {} limbs", skeleton.len());
        Ok(Self { skeleton, handles })
    }

    pub fn limb(&self, role: LimbRole) -> LimbId {
        self.handles[role.index()]
    }

    pub fn role_of(&self, id: LimbId) -> Option<LimbRole> {
        LimbRole::ALL
            .into_iter()
            .find(|role| self.handles[role.index()] == id)
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    pub fn rotate<S: RenderSink + ?Sized>(
        &mut self,
        role: LimbRole,
        angle: f64,
        axis: Axis,
        sink: &mut S,
    ) -> Result<SyncReport, RigError> {
        let id = self.limb(role);
        self.skeleton.rotate_around_pivot(id, angle, axis, sink)
    }

    pub fn translate<S: RenderSink + ?Sized>(
        &mut self,
        role: LimbRole,
        speed: f64,
        sink: &mut S,
    ) -> Result<SyncReport, RigError> {
        let id = self.limb(role);
        self.skeleton.translate_along_heading(id, speed, sink)
    }

    pub fn look_at<S: RenderSink + ?Sized>(
        &mut self,
        role: LimbRole,
        target: DVec3,
        sink: &mut S,
    ) -> Result<SyncReport, RigError> {
        let id = self.limb(role);
        self.skeleton.look_at(id, target, sink)
    }
}
