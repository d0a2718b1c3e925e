//! Spatial inertia of rigid bodies and articulated bodies.

use crate::spatial::{SpatialMat, SpatialTransform, SpatialVec};
use crate::{Mat3, Mat6, Vec3, mat3_from_row_slice, mat3_write_row_slice, skew, vec3_from_slice};

/// Spatial inertia of a rigid body, expressed in the body frame.
///
/// Stored compactly as mass, centre-of-mass offset, and rotational inertia
/// about the centre of mass (thirteen floats) rather than as the full 6x6
/// operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialInertia {
    /// Mass of the body.
    pub mass: f64,
    /// Center of mass position in body frame.
    pub com: Vec3,
    /// Rotational inertia about the center of mass (3x3 symmetric).
    pub inertia: Mat3,
}

impl SpatialInertia {
    /// Length of the flat layout: 9 row-major inertia entries, 3 offset, 1 mass.
    pub const FLAT_LEN: usize = 13;

    /// Create a spatial inertia with the given mass, CoM offset, and inertia matrix.
    pub fn new(mass: f64, com: Vec3, inertia: Mat3) -> Self {
        Self { mass, com, inertia }
    }

    /// Build from rotational inertia, centre-of-mass offset and mass.
    ///
    /// `rot_inertia` should be symmetric positive semi-definite. It is not
    /// checked; a bad tensor gives numerically defined but meaningless forces.
    pub fn from_rotational_inertia_mass_offset(rot_inertia: Mat3, com: Vec3, mass: f64) -> Self {
        Self::new(mass, com, rot_inertia)
    }

    /// Create spatial inertia for a point mass at a given position.
    pub fn point_mass(mass: f64, pos: Vec3) -> Self {
        Self {
            mass,
            com: pos,
            inertia: Mat3::zeros(),
        }
    }

    /// Create spatial inertia for a uniform sphere centred on the origin.
    pub fn sphere(mass: f64, radius: f64) -> Self {
        let i = 2.0 / 5.0 * mass * radius * radius;
        Self {
            mass,
            com: Vec3::zeros(),
            inertia: Mat3::from_diagonal(&Vec3::new(i, i, i)),
        }
    }

    /// Create spatial inertia for a uniform box with full side lengths `size`,
    /// centred at `com`.
    pub fn cuboid(mass: f64, size: Vec3, com: Vec3) -> Self {
        let (x2, y2, z2) = (size.x * size.x, size.y * size.y, size.z * size.z);
        let k = mass / 12.0;
        Self {
            mass,
            com,
            inertia: Mat3::from_diagonal(&Vec3::new(k * (y2 + z2), k * (x2 + z2), k * (x2 + y2))),
        }
    }

    /// Read the 13-float layout.
    pub fn from_slice(s: &[f64]) -> Self {
        Self {
            inertia: mat3_from_row_slice(s),
            com: vec3_from_slice(&s[9..12]),
            mass: s[12],
        }
    }

    /// Write the 13-float layout into `dst`.
    pub fn write_to_slice(&self, dst: &mut [f64]) {
        mat3_write_row_slice(&self.inertia, dst);
        dst[9] = self.com.x;
        dst[10] = self.com.y;
        dst[11] = self.com.z;
        dst[12] = self.mass;
    }

    /// Apply the inertia operator to a motion vector: `I · [w; v]`.
    ///
    /// Evaluated without forming the 6x6 matrix:
    /// `[Ic w + m c × (v - c × w); m (v - c × w)]`.
    #[inline]
    pub fn apply(&self, m: &SpatialVec) -> SpatialVec {
        let w = m.angular();
        let v_com = m.linear() - self.com.cross(&w);
        let linear = v_com * self.mass;
        SpatialVec::new(self.inertia * w + self.com.cross(&linear), linear)
    }

    /// Convert to 6x6 spatial inertia matrix (about the body frame origin).
    ///
    /// I_spatial = | Ic + m[c]×[c]×ᵀ   m[c]× |
    ///             | m[c]×ᵀ             mE    |
    pub fn to_matrix(&self) -> SpatialMat {
        let cx = skew(&self.com);
        let m = self.mass;

        let mut mat = Mat6::zeros();
        let top_left = self.inertia + cx * cx.transpose() * m;
        mat.fixed_view_mut::<3, 3>(0, 0).copy_from(&top_left);
        let mcx = cx * m;
        mat.fixed_view_mut::<3, 3>(0, 3).copy_from(&mcx);
        mat.fixed_view_mut::<3, 3>(3, 0).copy_from(&mcx.transpose());
        mat.fixed_view_mut::<3, 3>(3, 3)
            .copy_from(&(Mat3::identity() * m));

        SpatialMat::from_mat6(mat)
    }
}

/// General symmetric 6x6 inertia, the articulated-body form.
///
/// Unlike [`SpatialInertia`] it has no compact parameterisation, so it is
/// kept as a full matrix. Useful for re-expressing inertia in another frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArticulatedInertia {
    pub data: Mat6,
}

impl ArticulatedInertia {
    /// Expand a rigid-body inertia into its 6x6 form.
    pub fn from_spatial_inertia(si: &SpatialInertia) -> Self {
        Self {
            data: si.to_matrix().data,
        }
    }

    /// Apply to a motion vector.
    #[inline]
    pub fn apply(&self, m: &SpatialVec) -> SpatialVec {
        SpatialVec {
            data: self.data * m.data,
        }
    }

    /// Re-express this inertia through `xf`: `X* · I · X⁻¹`.
    ///
    /// For an inertia given in frame A and `xf = ᴮX_A`, the result is the
    /// same inertia in frame B.
    pub fn xstar_i_xinv(&self, xf: &SpatialTransform) -> Self {
        Self {
            data: xf.to_force_matrix() * self.data * xf.inverse().to_motion_matrix(),
        }
    }

    /// Carry this inertia back through `xf`: `Xᵀ · I · X`.
    ///
    /// The inverse of [`xstar_i_xinv`](Self::xstar_i_xinv); the form used
    /// when accumulating child inertia into a parent frame.
    pub fn xt_i_x(&self, xf: &SpatialTransform) -> Self {
        let x = xf.to_motion_matrix();
        Self {
            data: x.transpose() * self.data * x,
        }
    }

    /// Maximum asymmetry `|I - Iᵀ|` is within `eps`.
    pub fn is_symmetric(&self, eps: f64) -> bool {
        (self.data - self.data.transpose())
            .iter()
            .all(|d| d.abs() <= eps)
    }

    /// Componentwise comparison.
    pub fn approx_eq(&self, other: &ArticulatedInertia, eps: f64) -> bool {
        (self.data - other.data).iter().all(|d| d.abs() <= eps)
    }
}

impl From<SpatialInertia> for ArticulatedInertia {
    fn from(si: SpatialInertia) -> Self {
        Self::from_spatial_inertia(&si)
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn inertia_matrix_is_symmetric(
            mass in 0.1..100.0_f64,
            sx in 0.01..5.0_f64,
            sy in 0.01..5.0_f64,
            sz in 0.01..5.0_f64,
            cx in -2.0..2.0_f64,
            cy in -2.0..2.0_f64,
        ) {
            let si = SpatialInertia::cuboid(mass, Vec3::new(sx, sy, sz), Vec3::new(cx, cy, 0.0));
            prop_assert!(ArticulatedInertia::from(si).is_symmetric(1e-9));
        }

        #[test]
        fn kinetic_energy_is_non_negative(
            mass in 0.1..10.0_f64,
            r in 0.01..2.0_f64,
            wx in -5.0..5.0_f64,
            vy in -5.0..5.0_f64,
            cz in -1.0..1.0_f64,
        ) {
            let mut si = SpatialInertia::sphere(mass, r);
            si.com = Vec3::new(0.0, 0.0, cz);
            let v = SpatialVec::new(Vec3::new(wx, 0.0, 0.0), Vec3::new(0.0, vy, 0.0));
            prop_assert!(v.dot(&si.apply(&v)) >= -1e-9);
        }
    }
}
