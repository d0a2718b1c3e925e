//! Unit quaternions for joint rotations.
//!
//! Convention: q = [w; x; y; z], scalar first. The flat joint layout uses the
//! same order, four floats per joint.

use crate::{Mat3, Vec3};

/// A unit quaternion representing a 3D rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    /// Scalar part (w).
    pub w: f64,
    /// Vector part (x, y, z).
    pub v: Vec3,
}

impl Quat {
    /// Create a new quaternion from scalar and vector parts.
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            w,
            v: Vec3::new(x, y, z),
        }
    }

    /// Identity quaternion (no rotation).
    pub fn identity() -> Self {
        Self {
            w: 1.0,
            v: Vec3::zeros(),
        }
    }

    /// Read a scalar-first quaternion from the first four entries of `s`.
    #[inline]
    pub fn from_slice(s: &[f64]) -> Self {
        Self::new(s[0], s[1], s[2], s[3])
    }

    /// Write this quaternion scalar-first into the first four entries of `dst`.
    #[inline]
    pub fn write_to_slice(&self, dst: &mut [f64]) {
        dst[0] = self.w;
        dst[1] = self.v.x;
        dst[2] = self.v.y;
        dst[3] = self.v.z;
    }

    /// Create quaternion from axis-angle representation.
    /// axis should be a unit vector, angle in radians.
    pub fn from_axis_angle(axis: &Vec3, angle: f64) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        Self { w: c, v: *axis * s }
    }

    /// Squared norm.
    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.w * self.w + self.v.norm_squared()
    }

    /// Normalize this quaternion to unit length.
    pub fn normalize(&self) -> Self {
        let norm = self.norm_squared().sqrt();
        if norm < 1e-12 {
            return Self::identity();
        }
        Self {
            w: self.w / norm,
            v: self.v / norm,
        }
    }

    /// Conjugate of the quaternion (inverse for unit quaternions).
    #[inline]
    pub fn conjugate(&self) -> Quat {
        Quat {
            w: self.w,
            v: -self.v,
        }
    }

    /// Convert quaternion to 3x3 rotation matrix.
    ///
    /// The result maps vectors expressed in the rotated frame into the
    /// reference frame. Precondition: unit norm.
    pub fn to_matrix(&self) -> Mat3 {
        let w = self.w;
        let x = self.v.x;
        let y = self.v.y;
        let z = self.v.z;

        let x2 = x * x;
        let y2 = y * y;
        let z2 = z * z;
        let xy = x * y;
        let xz = x * z;
        let yz = y * z;
        let wx = w * x;
        let wy = w * y;
        let wz = w * z;

        Mat3::new(
            1.0 - 2.0 * (y2 + z2),
            2.0 * (xy - wz),
            2.0 * (xz + wy),
            2.0 * (xy + wz),
            1.0 - 2.0 * (x2 + z2),
            2.0 * (yz - wx),
            2.0 * (xz - wy),
            2.0 * (yz + wx),
            1.0 - 2.0 * (x2 + y2),
        )
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Quat {
    type Output = Quat;

    /// Hamilton product: `self * rhs` applies `rhs` first.
    fn mul(self, rhs: Quat) -> Quat {
        Quat {
            w: self.w * rhs.w - self.v.dot(&rhs.v),
            v: self.v.cross(&rhs.v) + rhs.v * self.w + self.v * rhs.w,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-10;

    #[test]
    fn test_identity() {
        let q = Quat::identity();
        assert_eq!(q.w, 1.0);
        assert_eq!(q.v, Vec3::zeros());
        assert_relative_eq!(q.to_matrix(), Mat3::identity(), epsilon = EPS);
    }

    #[test]
    fn test_slice_layout_is_scalar_first() {
        let buf = [0.5, 0.1, 0.2, 0.3, 9.0];
        let q = Quat::from_slice(&buf);
        assert_eq!(q.w, 0.5);
        assert_eq!(q.v, Vec3::new(0.1, 0.2, 0.3));

        let mut out = [0.0; 4];
        q.write_to_slice(&mut out);
        assert_eq!(out, [0.5, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_normalize() {
        let q = Quat::new(1.0, 2.0, 3.0, 4.0).normalize();
        assert_relative_eq!(q.norm_squared(), 1.0, epsilon = EPS);
        assert_eq!(Quat::new(0.0, 0.0, 0.0, 0.0).normalize(), Quat::identity());
    }

    #[test]
    fn test_multiplication() {
        let axis = Vec3::z();
        let q1 = Quat::from_axis_angle(&axis, FRAC_PI_2);
        let q2 = Quat::from_axis_angle(&axis, FRAC_PI_2);
        let result = q1 * q2;
        let expected = Quat::from_axis_angle(&axis, PI);

        assert_relative_eq!(result.w, expected.w, epsilon = EPS);
        assert_relative_eq!(result.v, expected.v, epsilon = EPS);
    }

    #[test]
    fn test_to_matrix_maps_x_to_y() {
        let q = Quat::from_axis_angle(&Vec3::z(), FRAC_PI_2);
        let y = q.to_matrix() * Vec3::x();
        assert_relative_eq!(y, Vec3::y(), epsilon = EPS);
    }

    #[test]
    fn test_conjugate_matrix_is_transpose() {
        let q = Quat::new(0.5, 0.5, 0.5, 0.5);
        assert_relative_eq!(
            q.conjugate().to_matrix(),
            q.to_matrix().transpose(),
            epsilon = EPS
        );
        let result = q * q.conjugate();
        assert_relative_eq!(result.w, 1.0, epsilon = EPS);
        assert!(result.v.norm() < EPS);
    }
}
