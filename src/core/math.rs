//! 3-D math primitives for rigid-body point transformation.
//!
//! All arithmetic is `f64`; coordinates pass through the pipeline unchanged
//! apart from the rigid transform itself (no rounding, no unit conversion).

use serde::{Deserialize, Serialize};

/// A 3-D vector or point in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X coordinate in meters
    pub x: f64,
    /// Y coordinate in meters
    pub y: f64,
    /// Z coordinate in meters
    pub z: f64,
}

impl Vec3 {
    /// Create a new vector.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    #[inline]
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Component-wise sum.
    #[inline]
    pub fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::zero()
    }
}

/// A unit quaternion representing a 3-D rotation (w, x, y, z convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    /// Create a quaternion. The caller is responsible for providing a unit
    /// quaternion (|q| = 1).
    #[inline]
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// The identity rotation (no rotation).
    #[inline]
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// The axis is normalized internally; a zero axis yields the identity
    /// rotation.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let norm = axis.norm();
        if norm == 0.0 {
            return Self::identity();
        }
        let (sin_half, cos_half) = (angle / 2.0).sin_cos();
        let scale = sin_half / norm;
        Self::new(cos_half, axis.x * scale, axis.y * scale, axis.z * scale)
    }

    /// Hamilton product: compose two rotations.
    #[inline]
    pub fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }

    /// Conjugate (== inverse for a unit quaternion).
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Rotate a vector by this quaternion: p' = q * p * q*.
    #[inline]
    pub fn rotate(self, v: Vec3) -> Vec3 {
        // Express v as a pure quaternion.
        let p = Self::new(0.0, v.x, v.y, v.z);
        let rotated = self.mul(p).mul(self.conjugate());
        Vec3::new(rotated.x, rotated.y, rotated.z)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

/// A rigid-body 3-D transform: rotation followed by translation.
///
/// Maps coordinates expressed in a link's local body frame into the world
/// frame: `p_world = R · p_local + t`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Rotation as a unit quaternion
    pub rotation: Quaternion,
    /// Translation in meters
    pub translation: Vec3,
}

impl RigidTransform {
    /// Create a transform from a rotation and translation.
    #[inline]
    pub fn new(rotation: Quaternion, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// The identity transform (no rotation, no translation).
    #[inline]
    pub fn identity() -> Self {
        Self::new(Quaternion::identity(), Vec3::zero())
    }

    /// Map a point from the local frame into the world frame.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.rotate(p).add(self.translation)
    }

    /// Compose two transforms: `self` applied first, then `other` within it.
    ///
    /// If `self` = T_A_B and `other` = T_B_C, the result is T_A_C.
    #[inline]
    pub fn compose(&self, other: &Self) -> Self {
        Self::new(
            self.rotation.mul(other.rotation),
            self.translation.add(self.rotation.rotate(other.translation)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn quaternion_identity_rotate_is_noop() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let r = Quaternion::identity().rotate(v);
        assert_eq!(r, v);
    }

    #[test]
    fn quaternion_90deg_yaw_rotates_x_to_y() {
        let q = Quaternion::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), FRAC_PI_2);
        let r = q.rotate(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(r.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn quaternion_conjugate_is_inverse() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.7);
        let prod = q.mul(q.conjugate());
        assert_relative_eq!(prod.w, 1.0, epsilon = 1e-12);
        assert_relative_eq!(prod.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(prod.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(prod.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn from_axis_angle_normalizes_axis() {
        // Same rotation whether the axis comes in unit-length or scaled.
        let a = Quaternion::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), PI / 3.0);
        let b = Quaternion::from_axis_angle(Vec3::new(0.0, 0.0, 10.0), PI / 3.0);
        assert_relative_eq!(a.w, b.w, epsilon = 1e-12);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-12);
    }

    #[test]
    fn from_axis_angle_zero_axis_is_identity() {
        let q = Quaternion::from_axis_angle(Vec3::zero(), 1.0);
        assert_eq!(q, Quaternion::identity());
    }

    #[test]
    fn transform_point_identity_is_exact() {
        let v = Vec3::new(0.125, -4.5, 7.75);
        assert_eq!(RigidTransform::identity().transform_point(v), v);
    }

    #[test]
    fn transform_point_translation_only() {
        let tf = RigidTransform::new(Quaternion::identity(), Vec3::new(1.0, 2.0, 3.0));
        let p = tf.transform_point(Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(p, Vec3::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn transform_point_rotation_then_translation() {
        // 90° about Z plus (0, 0, 1): (1, 0, 0) must land on (0, 1, 1).
        let tf = RigidTransform::new(
            Quaternion::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), FRAC_PI_2),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let p = tf.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn compose_chains_transforms() {
        // base yawed 90°, child 1 m forward in base frame: world position (0, 1, 0).
        let base = RigidTransform::new(
            Quaternion::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), FRAC_PI_2),
            Vec3::zero(),
        );
        let child = RigidTransform::new(Quaternion::identity(), Vec3::new(1.0, 0.0, 0.0));
        let world = base.compose(&child);
        assert_relative_eq!(world.translation.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(world.translation.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(world.translation.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn compose_translations_add() {
        let t1 = RigidTransform::new(Quaternion::identity(), Vec3::new(1.0, 0.0, 0.0));
        let t2 = RigidTransform::new(Quaternion::identity(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(t1.compose(&t2).translation.x, 3.0);
    }
}
