//! 6D spatial algebra following Featherstone's "Rigid Body Dynamics Algorithms".
//!
//! Convention: spatial vectors are [angular; linear] (Featherstone order).
//! A spatial motion vector (twist): [ω; v]
//! A spatial force vector (wrench): [n; f]
//!
//! Motion and force vectors share one type. Which flavour a value is follows
//! from the operation applied to it: `apply_motion` / `cross_motion` for
//! twists, `apply_force` / `cross_force` for wrenches.

use crate::{Mat3, Mat6, Quat, Vec3, Vec6, skew, vec3_from_slice};

/// 6D spatial vector, either a motion vector (twist) or force vector (wrench).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialVec {
    /// The underlying 6D vector [angular(3); linear(3)].
    pub data: Vec6,
}

impl SpatialVec {
    /// Create from angular and linear parts.
    #[inline]
    pub fn new(angular: Vec3, linear: Vec3) -> Self {
        Self {
            data: Vec6::new(
                angular.x, angular.y, angular.z, linear.x, linear.y, linear.z,
            ),
        }
    }

    /// Pure angular vector `[w; 0]`.
    #[inline]
    pub fn angular_only(angular: Vec3) -> Self {
        Self::new(angular, Vec3::zeros())
    }

    /// Zero spatial vector.
    #[inline]
    pub fn zero() -> Self {
        Self {
            data: Vec6::zeros(),
        }
    }

    /// Read six floats, angular part first.
    #[inline]
    pub fn from_slice(s: &[f64]) -> Self {
        Self {
            data: Vec6::from_column_slice(&s[..6]),
        }
    }

    /// Write six floats, angular part first, into `dst`.
    #[inline]
    pub fn write_to_slice(&self, dst: &mut [f64]) {
        dst[..6].copy_from_slice(self.data.as_slice());
    }

    /// Angular (top 3) component.
    #[inline]
    pub fn angular(&self) -> Vec3 {
        Vec3::new(self.data[0], self.data[1], self.data[2])
    }

    /// Linear (bottom 3) component.
    #[inline]
    pub fn linear(&self) -> Vec3 {
        Vec3::new(self.data[3], self.data[4], self.data[5])
    }

    /// Spatial cross product for motion vectors: `self ×ₘ other`.
    ///
    /// `[w; v] × [w2; v2] = [w × w2; w × v2 + v × w2]`
    pub fn cross_motion(&self, other: &SpatialVec) -> SpatialVec {
        let w = self.angular();
        let v = self.linear();
        let w2 = other.angular();
        let v2 = other.linear();
        SpatialVec::new(w.cross(&w2), w.cross(&v2) + v.cross(&w2))
    }

    /// Spatial cross product acting on a force vector: `self ×* other`.
    ///
    /// `[w; v] ×* [n; f] = [w × n + v × f; w × f]`. This is the dual of
    /// `cross_motion`, i.e. `-(self ×ₘ)ᵀ`; the linear part lands in the
    /// angular slot, not the other way round.
    pub fn cross_force(&self, other: &SpatialVec) -> SpatialVec {
        let w = self.angular();
        let v = self.linear();
        let n = other.angular();
        let f = other.linear();
        SpatialVec::new(w.cross(&n) + v.cross(&f), w.cross(&f))
    }

    /// Dot product of two spatial vectors (power when pairing motion with force).
    #[inline]
    pub fn dot(&self, other: &SpatialVec) -> f64 {
        self.data.dot(&other.data)
    }
}

impl Default for SpatialVec {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::ops::Add for SpatialVec {
    type Output = SpatialVec;
    #[inline]
    fn add(self, rhs: SpatialVec) -> SpatialVec {
        SpatialVec {
            data: self.data + rhs.data,
        }
    }
}

impl std::ops::AddAssign for SpatialVec {
    #[inline]
    fn add_assign(&mut self, rhs: SpatialVec) {
        self.data += rhs.data;
    }
}

impl std::ops::Sub for SpatialVec {
    type Output = SpatialVec;
    #[inline]
    fn sub(self, rhs: SpatialVec) -> SpatialVec {
        SpatialVec {
            data: self.data - rhs.data,
        }
    }
}

impl std::ops::Mul<f64> for SpatialVec {
    type Output = SpatialVec;
    #[inline]
    fn mul(self, rhs: f64) -> SpatialVec {
        SpatialVec {
            data: self.data * rhs,
        }
    }
}

impl std::ops::Neg for SpatialVec {
    type Output = SpatialVec;
    #[inline]
    fn neg(self) -> SpatialVec {
        SpatialVec { data: -self.data }
    }
}

/// 6x6 spatial matrix (explicit Plücker transforms, cross-product operators).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMat {
    pub data: Mat6,
}

impl SpatialMat {
    /// Create from a 6x6 nalgebra matrix.
    #[inline]
    pub fn from_mat6(data: Mat6) -> Self {
        Self { data }
    }

    /// Motion cross-product operator `[v ×ₘ]`.
    pub fn cross_motion_operator(v: &SpatialVec) -> Self {
        let wx = skew(&v.angular());
        let vx = skew(&v.linear());
        let mut m = Mat6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&wx);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&vx);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&wx);
        Self { data: m }
    }

    /// Force cross-product operator `[v ×*] = -[v ×ₘ]ᵀ`.
    pub fn cross_force_operator(v: &SpatialVec) -> Self {
        Self {
            data: -Self::cross_motion_operator(v).data.transpose(),
        }
    }

    /// Multiply by a spatial vector.
    #[inline]
    pub fn mul_vec(&self, v: &SpatialVec) -> SpatialVec {
        SpatialVec {
            data: self.data * v.data,
        }
    }
}

/// Compact Plücker transform between two adjacent body frames.
///
/// Represents the coordinate change from frame A (parent) to frame B (child),
/// stored as the 3x3 rotation E taking A coordinates to B coordinates and the
/// position r of B's origin expressed in A. Twelve floats instead of the
/// thirty-six of the full 6x6 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialTransform {
    /// Rotation from frame A to frame B. Must be orthonormal.
    pub rot: Mat3,
    /// Position of frame B's origin expressed in frame A.
    pub pos: Vec3,
}

impl SpatialTransform {
    /// Length of the flat layout: 9 row-major rotation entries, then translation.
    pub const FLAT_LEN: usize = 12;

    /// Create from rotation matrix and translation.
    ///
    /// The rotation is trusted to be proper; nothing is checked.
    pub fn new(rot: Mat3, pos: Vec3) -> Self {
        Self { rot, pos }
    }

    /// Create from a unit quaternion and translation.
    ///
    /// The rotation part is `q.to_matrix()`. A non-unit quaternion produces a
    /// non-orthonormal rotation; that is the caller's problem.
    pub fn from_quat_translation(q: &Quat, pos: Vec3) -> Self {
        Self {
            rot: q.to_matrix(),
            pos,
        }
    }

    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            rot: Mat3::identity(),
            pos: Vec3::zeros(),
        }
    }

    /// Coordinate rotation about the X axis (Featherstone's `rx`).
    pub fn rot_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rot: Mat3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c),
            pos: Vec3::zeros(),
        }
    }

    /// Coordinate rotation about the Y axis (Featherstone's `ry`).
    pub fn rot_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rot: Mat3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c),
            pos: Vec3::zeros(),
        }
    }

    /// Coordinate rotation about the Z axis (Featherstone's `rz`).
    pub fn rot_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rot: Mat3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0),
            pos: Vec3::zeros(),
        }
    }

    /// Pure translation.
    pub fn translation(pos: Vec3) -> Self {
        Self {
            rot: Mat3::identity(),
            pos,
        }
    }

    /// Read the 12-float layout (row-major rotation, then translation).
    pub fn from_slice(s: &[f64]) -> Self {
        Self {
            rot: crate::mat3_from_row_slice(s),
            pos: vec3_from_slice(&s[9..12]),
        }
    }

    /// Write the 12-float layout into `dst`.
    pub fn write_to_slice(&self, dst: &mut [f64]) {
        crate::mat3_write_row_slice(&self.rot, dst);
        dst[9] = self.pos.x;
        dst[10] = self.pos.y;
        dst[11] = self.pos.z;
    }

    /// Get the 6x6 Plücker transform matrix for motion vectors.
    ///
    /// X = |  E      0 |
    ///     | -E[r]×  E |
    pub fn to_motion_matrix(&self) -> Mat6 {
        let e = self.rot;
        let neg_erx = -e * skew(&self.pos);

        let mut m = Mat6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&e);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&neg_erx);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&e);
        m
    }

    /// Get the 6x6 Plücker transform matrix for force vectors.
    ///
    /// X* = | E  -E[r]× |
    ///      | 0   E     |
    ///
    /// This is the transpose-inverse of the motion transform.
    pub fn to_force_matrix(&self) -> Mat6 {
        let e = self.rot;
        let neg_erx = -e * skew(&self.pos);

        let mut m = Mat6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&e);
        m.fixed_view_mut::<3, 3>(0, 3).copy_from(&neg_erx);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&e);
        m
    }

    /// Transform a spatial motion vector from frame A to frame B.
    ///
    /// `[w; v] -> [E w; E (v - r × w)]`
    #[inline]
    pub fn apply_motion(&self, m: &SpatialVec) -> SpatialVec {
        let w = m.angular();
        let v = m.linear();
        SpatialVec::new(self.rot * w, self.rot * (v - self.pos.cross(&w)))
    }

    /// Transform a spatial force vector from frame A to frame B.
    ///
    /// `[n; f] -> [E (n - r × f); E f]`
    #[inline]
    pub fn apply_force(&self, f: &SpatialVec) -> SpatialVec {
        let n = f.angular();
        let force = f.linear();
        SpatialVec::new(self.rot * (n - self.pos.cross(&force)), self.rot * force)
    }

    /// Inverse transform a spatial motion vector (from B back to A).
    ///
    /// `[w; v] -> [Eᵀ w; Eᵀ v + r × Eᵀ w]`, without forming the inverse.
    #[inline]
    pub fn inv_apply_motion(&self, m: &SpatialVec) -> SpatialVec {
        let rt = self.rot.transpose();
        let w = rt * m.angular();
        SpatialVec::new(w, rt * m.linear() + self.pos.cross(&w))
    }

    /// Inverse transform a spatial force vector (from B back to A).
    ///
    /// `[n; f] -> [Eᵀ n + r × Eᵀ f; Eᵀ f]`. This is `Xᵀ` applied to a
    /// force, the accumulation step of the RNEA backward pass.
    #[inline]
    pub fn inv_apply_force(&self, f: &SpatialVec) -> SpatialVec {
        let rt = self.rot.transpose();
        let force = rt * f.linear();
        SpatialVec::new(rt * f.angular() + self.pos.cross(&force), force)
    }

    /// Compose two transforms as the matrix product `self · other`.
    ///
    /// `other` is applied first: for `other = ᴮX_A` and `self = ᶜX_B` the
    /// result is `ᶜX_A`, with `E = E_self E_other` and
    /// `r = r_other + E_otherᵀ r_self`.
    pub fn compose(&self, other: &SpatialTransform) -> SpatialTransform {
        SpatialTransform {
            rot: self.rot * other.rot,
            pos: other.pos + other.rot.transpose() * self.pos,
        }
    }

    /// Spatial inverse of this transform: `E' = Eᵀ`, `r' = -E r`.
    pub fn inverse(&self) -> SpatialTransform {
        SpatialTransform {
            rot: self.rot.transpose(),
            pos: -(self.rot * self.pos),
        }
    }

    /// Componentwise comparison of rotation and translation.
    pub fn approx_eq(&self, other: &SpatialTransform, eps: f64) -> bool {
        (self.rot - other.rot).iter().all(|d| d.abs() <= eps)
            && (self.pos - other.pos).iter().all(|d| d.abs() <= eps)
    }
}

impl Default for SpatialTransform {
    fn default() -> Self {
        Self::identity()
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use nalgebra as na;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn arb_pos() -> impl Strategy<Value = Vec3> {
        (-10.0..10.0_f64, -10.0..10.0_f64, -10.0..10.0_f64)
            .prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    fn arb_unit_axis() -> impl Strategy<Value = Vec3> {
        (-1.0..1.0_f64, -1.0..1.0_f64, -1.0..1.0_f64)
            .prop_filter("non-zero axis", |(x, y, z)| x * x + y * y + z * z > 0.01)
            .prop_map(|(x, y, z)| Vec3::new(x, y, z).normalize())
    }

    fn arb_transform() -> impl Strategy<Value = SpatialTransform> {
        (
            arb_unit_axis(),
            -std::f64::consts::PI..std::f64::consts::PI,
            arb_pos(),
        )
            .prop_map(|(axis, angle, pos)| {
                SpatialTransform::from_quat_translation(&Quat::from_axis_angle(&axis, angle), pos)
            })
    }

    fn arb_spatial_vec() -> impl Strategy<Value = SpatialVec> {
        (arb_pos(), arb_pos()).prop_map(|(a, l)| SpatialVec::new(a, l))
    }

    fn close(a: &Vec6, b: &Vec6) -> bool {
        (a - b).iter().all(|d| d.abs() < EPS)
    }

    proptest! {
        #[test]
        fn compose_with_inverse_is_identity(xf in arb_transform()) {
            let result = xf.compose(&xf.inverse());
            prop_assert!(result.approx_eq(&SpatialTransform::identity(), EPS),
                "X·X⁻¹ = {:?}", result);
        }

        #[test]
        fn compose_matches_matrix_product(a in arb_transform(), b in arb_transform()) {
            let composed = a.compose(&b).to_motion_matrix();
            let product = a.to_motion_matrix() * b.to_motion_matrix();
            prop_assert!((composed - product).iter().all(|d| d.abs() < 1e-8));
        }

        #[test]
        fn compose_is_associative(
            a in arb_transform(),
            b in arb_transform(),
            c in arb_transform(),
        ) {
            let ab_c = a.compose(&b).compose(&c);
            let a_bc = a.compose(&b.compose(&c));
            prop_assert!(ab_c.approx_eq(&a_bc, 1e-8));
        }

        #[test]
        fn apply_motion_matches_matrix(xf in arb_transform(), v in arb_spatial_vec()) {
            let mat_result = xf.to_motion_matrix() * v.data;
            prop_assert!(close(&xf.apply_motion(&v).data, &mat_result));
        }

        #[test]
        fn apply_force_matches_matrix(xf in arb_transform(), f in arb_spatial_vec()) {
            let mat_result = xf.to_force_matrix() * f.data;
            prop_assert!(close(&xf.apply_force(&f).data, &mat_result));
        }

        #[test]
        fn inverse_transform_undoes_apply(xf in arb_transform(), v in arb_spatial_vec()) {
            prop_assert!(close(&xf.inv_apply_motion(&xf.apply_motion(&v)).data, &v.data));
            prop_assert!(close(&xf.inv_apply_force(&xf.apply_force(&v)).data, &v.data));
        }

        #[test]
        fn power_is_frame_invariant(
            xf in arb_transform(),
            m in arb_spatial_vec(),
            f in arb_spatial_vec(),
        ) {
            let before = m.dot(&f);
            let after = xf.apply_motion(&m).dot(&xf.apply_force(&f));
            prop_assert!((before - after).abs() < 1e-7 * (1.0 + before.abs()));
        }

        #[test]
        fn quat_to_matrix_is_rotation(axis in arb_unit_axis(), angle in -3.0..3.0_f64) {
            let m = Quat::from_axis_angle(&axis, angle).normalize().to_matrix();
            prop_assert!((m.determinant() - 1.0).abs() < EPS);
            let rrt = m * m.transpose();
            prop_assert!((rrt - na::Matrix3::identity()).iter().all(|d| d.abs() < EPS));
        }
    }
}
