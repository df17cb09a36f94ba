//! Affine transform helpers built on [`glam::DAffine3`].
//!
//! Every function here is pure. Composition follows the usual matrix
//! convention: [`compose`]`(a, b)` applies `b` first, then `a`.

use glam::{DAffine3, DMat3, DMat4, DVec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An affine map (rotation, scale, translation).
///
/// Stored as a 3x4 matrix, so the implied bottom row is always `[0, 0, 0, 1]`.
pub type Transform = DAffine3;

/// One of the three principal rotation axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector along this axis.
    pub fn unit(self) -> DVec3 {
        match self {
            Self::X => DVec3::X,
            Self::Y => DVec3::Y,
            Self::Z => DVec3::Z,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::X => 0b001,
            Self::Y => 0b010,
            Self::Z => 0b100,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        f.write_str(name)
    }
}

/// A subset of {X, Y, Z}: the axes a limb is allowed to rotate about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisSet(u8);

impl AxisSet {
    pub const NONE: Self = Self(0);
    pub const X: Self = Self(Axis::X.bit());
    pub const Y: Self = Self(Axis::Y.bit());
    pub const Z: Self = Self(Axis::Z.bit());
    pub const ALL: Self = Self(0b111);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn contains(self, axis: Axis) -> bool {
        self.0 & axis.bit() != 0
    }

    pub fn insert(&mut self, axis: Axis) {
        self.0 |= axis.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the contained axes in X, Y, Z order.
    pub fn iter(self) -> impl Iterator<Item = Axis> {
        Axis::ALL.into_iter().filter(move |axis| self.contains(*axis))
    }
}

impl From<Axis> for AxisSet {
    fn from(axis: Axis) -> Self {
        Self(axis.bit())
    }
}

impl FromIterator<Axis> for AxisSet {
    fn from_iter<I: IntoIterator<Item = Axis>>(iter: I) -> Self {
        let mut set = Self::NONE;
        for axis in iter {
            set.insert(axis);
        }
        set
    }
}

pub fn identity() -> Transform {
    DAffine3::IDENTITY
}

pub fn translate(offset: DVec3) -> Transform {
    DAffine3::from_translation(offset)
}

/// Right-handed rotation of `angle` radians about `axis`.
pub fn rotate(angle: f64, axis: Axis) -> Transform {
    DAffine3::from_mat3(rotation_matrix(angle, axis))
}

/// Non-uniform scale along the principal axes.
pub fn scale(factors: DVec3) -> Transform {
    DAffine3::from_scale(factors)
}

/// `a ∘ b`: applies `b` first, then `a`.
pub fn compose(a: Transform, b: Transform) -> Transform {
    a * b
}

pub fn invert(m: Transform) -> Transform {
    m.inverse()
}

/// Rotation about `axis` through `pivot` instead of the origin.
pub fn rotate_about(angle: f64, axis: Axis, pivot: DVec3) -> Transform {
    translate(pivot) * rotate(angle, axis) * translate(-pivot)
}

/// The linear part of [`rotate`].
pub fn rotation_matrix(angle: f64, axis: Axis) -> DMat3 {
    match axis {
        Axis::X => DMat3::from_rotation_x(angle),
        Axis::Y => DMat3::from_rotation_y(angle),
        Axis::Z => DMat3::from_rotation_z(angle),
    }
}

pub fn rotate_vector(v: DVec3, angle: f64, axis: Axis) -> DVec3 {
    rotation_matrix(angle, axis) * v
}

/// Translation column of `m`: where `m` places the local origin.
pub fn anchor_of(m: &Transform) -> DVec3 {
    m.translation
}

/// Expands to the 4x4 homogeneous form consumed by renderers.
pub fn to_matrix(m: &Transform) -> DMat4 {
    DMat4::from(*m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn rotation_about_y_is_right_handed() {
        let p = rotate(FRAC_PI_2, Axis::Y).transform_point3(DVec3::X);
        assert!(p.abs_diff_eq(DVec3::new(0.0, 0.0, -1.0), EPS), "{p}");

        let p = rotate(FRAC_PI_2, Axis::X).transform_point3(DVec3::Y);
        assert!(p.abs_diff_eq(DVec3::Z, EPS), "{p}");

        let p = rotate(FRAC_PI_2, Axis::Z).transform_point3(DVec3::X);
        assert!(p.abs_diff_eq(DVec3::Y, EPS), "{p}");
    }

    #[test]
    fn compose_applies_right_operand_first() {
        let m = compose(translate(DVec3::X), scale(DVec3::splat(2.0)));
        let p = m.transform_point3(DVec3::ONE);
        assert!(p.abs_diff_eq(DVec3::new(3.0, 2.0, 2.0), EPS));
    }

    #[test]
    fn compose_is_associative() {
        let a = rotate(0.3, Axis::X);
        let b = translate(DVec3::new(1.0, -2.0, 0.5));
        let c = compose(rotate(1.1, Axis::Z), scale(DVec3::new(1.0, 2.0, 0.5)));
        let left = compose(compose(a, b), c);
        let right = compose(a, compose(b, c));
        assert!(left.abs_diff_eq(right, EPS));
    }

    #[test]
    fn invert_cancels_unit_scale_transforms() {
        let m = compose(
            translate(DVec3::new(3.0, 4.0, -1.0)),
            compose(rotate(0.7, Axis::Y), rotate(-PI / 3.0, Axis::X)),
        );
        assert!(compose(invert(m), m).abs_diff_eq(identity(), EPS));
        assert!(compose(m, invert(m)).abs_diff_eq(identity(), EPS));
    }

    #[test]
    fn rotate_about_keeps_pivot_fixed() {
        let pivot = DVec3::new(1.0, 2.0, 3.0);
        let m = rotate_about(1.234, Axis::Z, pivot);
        assert!(m.transform_point3(pivot).abs_diff_eq(pivot, EPS));
        assert!(anchor_of(&rotate_about(0.0, Axis::Z, pivot)).abs_diff_eq(DVec3::ZERO, EPS));
    }

    #[test]
    fn homogeneous_form_keeps_affine_bottom_row() {
        let m = to_matrix(&compose(translate(DVec3::ONE), rotate(0.4, Axis::X)));
        assert_eq!(m.row(3), glam::DVec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn axis_set_membership() {
        let set = AxisSet::X.union(AxisSet::Z);
        assert!(set.contains(Axis::X));
        assert!(!set.contains(Axis::Y));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Axis::X, Axis::Z]);
        assert_eq!([Axis::Z, Axis::X].into_iter().collect::<AxisSet>(), set);
        assert!(AxisSet::NONE.is_empty());
    }
}
