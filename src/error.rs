use crate::transform::Axis;
use thiserror::Error;

/// Errors reported by the rig.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RigError {
    /// Rotation requested about an axis the limb does not allow. No state changed.
    #[error("could not rotate `{limb}` along the {axis} axis: illegal move")]
    IllegalAxis { limb: String, axis: Axis },

    /// The declared topology is not a tree. Fatal at construction.
    #[error("malformed kinematic tree: {0}")]
    MalformedTree(#[from] TreeDefect),

    /// A name or handle that does not resolve to a limb of this rig.
    #[error("unknown limb: {0}")]
    UnknownLimb(String),
}

/// Why a [`SkeletonBuilder`](crate::SkeletonBuilder) refused to build.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeDefect {
    #[error("the tree has no limbs")]
    Empty,

    #[error("limb name `{0}` is used more than once")]
    DuplicateName(String),

    #[error("limb `{0}` is attached to itself")]
    SelfAttachment(String),

    #[error("limb `{child}` is attached under both `{first}` and `{second}`")]
    MultipleParents {
        child: String,
        first: String,
        second: String,
    },

    #[error("attaching `{child}` under `{parent}` closes a cycle")]
    Cycle { parent: String, child: String },

    #[error("more than one root limb: `{first}` and `{second}`")]
    MultipleRoots { first: String, second: String },

    #[error("limb handle {0} was not issued by this builder")]
    ForeignHandle(String),
}
