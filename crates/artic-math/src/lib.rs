//! Spatial algebra primitives for the artic inverse-dynamics solver.
//!
//! Implements 6D spatial vectors, compact Plücker transforms, and spatial
//! inertia following Featherstone's conventions. Every spatial quantity is
//! stored angular part first.

pub mod inertia;
pub mod quaternion;
pub mod spatial;

pub use inertia::{ArticulatedInertia, SpatialInertia};
pub use quaternion::Quat;
pub use spatial::{SpatialMat, SpatialTransform, SpatialVec};

use nalgebra as na;

/// 3D vector alias.
pub type Vec3 = na::Vector3<f64>;
/// 3x3 matrix alias.
pub type Mat3 = na::Matrix3<f64>;
/// 6D vector alias.
pub type Vec6 = na::Vector6<f64>;
/// 6x6 matrix alias.
pub type Mat6 = na::Matrix6<f64>;

/// Cross-product matrix: [v]× such that [v]× w = v × w.
#[inline]
pub fn skew(v: &Vec3) -> Mat3 {
    Mat3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Read a 3-vector from the first three entries of `s`.
#[inline]
pub fn vec3_from_slice(s: &[f64]) -> Vec3 {
    Vec3::new(s[0], s[1], s[2])
}

/// Read a row-major 3x3 matrix from the first nine entries of `s`.
#[inline]
pub fn mat3_from_row_slice(s: &[f64]) -> Mat3 {
    Mat3::from_row_slice(&s[..9])
}

/// Write `m` row-major into the first nine entries of `dst`.
#[inline]
pub fn mat3_write_row_slice(m: &Mat3, dst: &mut [f64]) {
    for r in 0..3 {
        for c in 0..3 {
            dst[r * 3 + c] = m[(r, c)];
        }
    }
}
