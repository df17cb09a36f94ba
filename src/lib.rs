//! # robot-rig
//!
//! An engine-agnostic articulated robot rig built on [glam](https://crates.io/crates/glam).
//!
//! The rig is a kinematic tree of [`Limb`]s. Each limb carries a fixed rest
//! transform and a mutable local transform; its world transform is the
//! composition of `local ∘ rest` along the chain from the root. Rotating a
//! limb turns it in place about its own anchor, translating moves it along its
//! heading, and either edit is pushed to the limb and all its descendants
//! through a [`RenderSink`]. Rendering, input devices and raycasting stay with
//! the host, behind the traits in [`render`] and [`input`].

pub mod blueprint;
pub mod control;
pub mod error;
pub mod input;
pub mod limb;
pub mod render;
pub mod robot;
pub mod session;
pub mod skeleton;
pub mod transform;

pub use blueprint::*;
pub use control::*;
pub use error::*;
pub use input::*;
pub use limb::*;
pub use render::*;
pub use robot::*;
pub use session::*;
pub use skeleton::*;
pub use transform::{Axis, AxisSet, Transform};
