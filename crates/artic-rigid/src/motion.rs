//! Per-joint commanded motion fed to the solver.

use crate::layout::{ANGULAR_STRIDE, QUAT_STRIDE, record};
use artic_math::{Quat, Vec3, vec3_from_slice};

/// Local motion of one ball joint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointMotion {
    /// Child orientation relative to the parent.
    pub rotation: Quat,
    /// Angular velocity in the child frame.
    pub angular_velocity: Vec3,
    /// Angular acceleration in the child frame.
    pub angular_acceleration: Vec3,
}

impl JointMotion {
    pub fn new(rotation: Quat, angular_velocity: Vec3, angular_acceleration: Vec3) -> Self {
        Self {
            rotation,
            angular_velocity,
            angular_acceleration,
        }
    }

    /// A joint held still at `rotation`.
    pub fn at_rest(rotation: Quat) -> Self {
        Self::new(rotation, Vec3::zeros(), Vec3::zeros())
    }
}

/// Read access to per-joint motion, whatever its storage.
///
/// Lets the solver passes run over typed [`JointMotion`] records and the flat
/// interop buffers without copying either.
pub trait MotionSource {
    fn rotation(&self, joint: usize) -> Quat;
    fn angular_velocity(&self, joint: usize) -> Vec3;
    fn angular_acceleration(&self, joint: usize) -> Vec3;
}

impl MotionSource for [JointMotion] {
    #[inline]
    fn rotation(&self, joint: usize) -> Quat {
        self[joint].rotation
    }

    #[inline]
    fn angular_velocity(&self, joint: usize) -> Vec3 {
        self[joint].angular_velocity
    }

    #[inline]
    fn angular_acceleration(&self, joint: usize) -> Vec3 {
        self[joint].angular_acceleration
    }
}

/// Motion stored in flat buffers: 4 floats per quaternion (scalar first),
/// 3 per angular velocity and acceleration.
#[derive(Debug, Clone, Copy)]
pub struct FlatMotion<'a> {
    rotations: &'a [f64],
    velocities: &'a [f64],
    accelerations: &'a [f64],
}

impl<'a> FlatMotion<'a> {
    pub fn new(rotations: &'a [f64], velocities: &'a [f64], accelerations: &'a [f64]) -> Self {
        Self {
            rotations,
            velocities,
            accelerations,
        }
    }

    /// Number of complete joint records in all three buffers.
    pub fn joint_capacity(&self) -> usize {
        (self.rotations.len() / QUAT_STRIDE)
            .min(self.velocities.len() / ANGULAR_STRIDE)
            .min(self.accelerations.len() / ANGULAR_STRIDE)
    }
}

impl MotionSource for FlatMotion<'_> {
    #[inline]
    fn rotation(&self, joint: usize) -> Quat {
        Quat::from_slice(&self.rotations[record(joint, QUAT_STRIDE)])
    }

    #[inline]
    fn angular_velocity(&self, joint: usize) -> Vec3 {
        vec3_from_slice(&self.velocities[record(joint, ANGULAR_STRIDE)])
    }

    #[inline]
    fn angular_acceleration(&self, joint: usize) -> Vec3 {
        vec3_from_slice(&self.accelerations[record(joint, ANGULAR_STRIDE)])
    }
}
