//! Recursive Newton-Euler Algorithm (RNEA): inverse dynamics.
//!
//! Given each ball joint's rotation, angular velocity and angular
//! acceleration, plus the base motion, compute the spatial force every joint
//! must transmit.
//!
//! A solver owns its scratch buffers and reuses them on every call, so one
//! instance must not be shared between threads without external locking.

use crate::error::{Result, RneaError};
use crate::layout::{
    ANGULAR_STRIDE, INERTIA_STRIDE, QUAT_STRIDE, SPATIAL_STRIDE, TRANSLATION_STRIDE, record,
};
use crate::motion::{FlatMotion, JointMotion, MotionSource};
use crate::topology::Topology;
use artic_math::{SpatialInertia, SpatialTransform, SpatialVec, Vec3, vec3_from_slice};

/// Inverse-dynamics solver for a fixed skeleton.
#[derive(Debug, Clone)]
pub struct RneaSolver {
    names: Vec<String>,
    /// Joint origin in the parent body frame, one per joint.
    offsets: Vec<Vec3>,
    /// Body inertia in the body frame, one per joint.
    inertias: Vec<SpatialInertia>,
    topology: Topology,
    scratch: Scratch,
}

/// Buffers overwritten by every solve.
#[derive(Debug, Clone)]
struct Scratch {
    /// `ⁱX_λ(i)` per joint.
    x_tree: Vec<SpatialTransform>,
    /// Per body, index 0 is the base.
    vel: Vec<SpatialVec>,
    /// Per body, index 0 is the base.
    acc: Vec<SpatialVec>,
    /// Per joint.
    forces: Vec<SpatialVec>,
}

impl Scratch {
    fn new(n: usize) -> Self {
        Self {
            x_tree: vec![SpatialTransform::identity(); n],
            vel: vec![SpatialVec::zero(); n + 1],
            acc: vec![SpatialVec::zero(); n + 1],
            forces: vec![SpatialVec::zero(); n],
        }
    }

    fn run<M: MotionSource + ?Sized>(
        &mut self,
        offsets: &[Vec3],
        inertias: &[SpatialInertia],
        topology: &Topology,
        v0: SpatialVec,
        a0: SpatialVec,
        motion: &M,
    ) {
        let n = offsets.len();

        // The joint quaternion gives the child relative to the parent; the
        // transform maps parent coordinates into the child, hence the conjugate.
        for (j, (x, r)) in self.x_tree.iter_mut().zip(offsets).enumerate() {
            *x = SpatialTransform::from_quat_translation(&motion.rotation(j).conjugate(), *r);
        }

        // ── Forward pass: velocities and accelerations ──
        self.vel[0] = v0;
        self.acc[0] = a0;
        for j in 0..n {
            let i = j + 1;
            let p = topology.parent_body(j);
            let x = &self.x_tree[j];

            let v_joint = SpatialVec::angular_only(motion.angular_velocity(j));
            let a_joint = SpatialVec::angular_only(motion.angular_acceleration(j));

            let v_i = x.apply_motion(&self.vel[p]) + v_joint;
            self.acc[i] = x.apply_motion(&self.acc[p]) + v_i.cross_motion(&v_joint) + a_joint;
            self.vel[i] = v_i;
        }

        // ── Backward pass: forces ──
        for (j, inertia) in inertias.iter().enumerate().take(n) {
            let v = &self.vel[j + 1];
            self.forces[j] = inertia.apply(&self.acc[j + 1]) + v.cross_force(&inertia.apply(v));
        }

        // Children carry higher indices than their parents, so a reverse
        // sweep has every child's total force ready before it is folded in.
        for j in (0..n).rev() {
            if let Some(p) = topology.parent(j) {
                let f = self.x_tree[j].inv_apply_force(&self.forces[j]);
                self.forces[p] += f;
            }
        }
    }
}

impl RneaSolver {
    /// Create a solver for `offsets.len()` joints.
    pub fn new(offsets: Vec<Vec3>, inertias: Vec<SpatialInertia>, topology: Topology) -> Result<Self> {
        let n = offsets.len();
        let names = (0..n).map(|j| format!("joint{j}")).collect();
        Self::with_names(names, offsets, inertias, topology)
    }

    /// Create a solver following an explicit parent array.
    pub fn tree(offsets: Vec<Vec3>, inertias: Vec<SpatialInertia>, parents: Vec<i32>) -> Result<Self> {
        Self::new(offsets, inertias, Topology::Tree { parents })
    }

    /// Create a solver for a chain: each joint hangs off its predecessor.
    pub fn chain(offsets: Vec<Vec3>, inertias: Vec<SpatialInertia>) -> Result<Self> {
        Self::new(offsets, inertias, Topology::Chain)
    }

    /// Create a solver from flat buffers.
    ///
    /// `translations` holds 3 floats per joint, `spatial_inertias` 13 per
    /// joint. Without `parents` the skeleton is treated as a chain.
    pub fn from_flat(
        joint_count: usize,
        translations: &[f64],
        spatial_inertias: &[f64],
        parents: Option<&[i32]>,
    ) -> Result<Self> {
        check_len("translations", translations, joint_count * TRANSLATION_STRIDE)?;
        check_len("spatial_inertias", spatial_inertias, joint_count * INERTIA_STRIDE)?;

        let offsets = (0..joint_count)
            .map(|j| vec3_from_slice(&translations[record(j, TRANSLATION_STRIDE)]))
            .collect();
        let inertias = (0..joint_count)
            .map(|j| SpatialInertia::from_slice(&spatial_inertias[record(j, INERTIA_STRIDE)]))
            .collect();
        let topology = match parents {
            Some(p) => Topology::Tree {
                parents: p.to_vec(),
            },
            None => Topology::Chain,
        };
        Self::new(offsets, inertias, topology)
    }

    pub(crate) fn with_names(
        names: Vec<String>,
        offsets: Vec<Vec3>,
        inertias: Vec<SpatialInertia>,
        topology: Topology,
    ) -> Result<Self> {
        let n = offsets.len();
        if n == 0 {
            return Err(RneaError::EmptyModel);
        }
        if inertias.len() != n {
            return Err(RneaError::CountMismatch {
                what: "spatial inertias",
                expected: n,
                actual: inertias.len(),
            });
        }
        debug_assert_eq!(names.len(), n);
        topology.validate(n)?;

        tracing::debug!(joints = n, topology = topology.name(), "created RNEA solver");

        Ok(Self {
            names,
            offsets,
            inertias,
            topology,
            scratch: Scratch::new(n),
        })
    }

    /// Number of joints (and of moving bodies).
    pub fn joint_count(&self) -> usize {
        self.offsets.len()
    }

    /// Parent-resolution strategy fixed at construction.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Joint names in index order.
    pub fn joint_names(&self) -> &[String] {
        &self.names
    }

    /// Index of the joint called `name`.
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Joint origins, each in its parent body frame.
    pub fn offsets(&self) -> &[Vec3] {
        &self.offsets
    }

    /// Body inertias, each in its own body frame.
    pub fn inertias(&self) -> &[SpatialInertia] {
        &self.inertias
    }

    /// Solve using the construction-time topology.
    ///
    /// * `forces`: output, 6 floats per joint (torque, then force)
    /// * `v0`, `a0`: spatial velocity and acceleration of the base, 6 floats each
    /// * `rotations`: joint quaternions, 4 floats per joint, scalar first
    /// * `velocities`, `accelerations`: local angular velocity and
    ///   acceleration, 3 floats per joint
    ///
    /// Buffer sizes are checked only in debug builds; an undersized buffer
    /// panics on out-of-bounds access in release builds.
    pub fn solve(
        &mut self,
        forces: &mut [f64],
        v0: &[f64],
        a0: &[f64],
        rotations: &[f64],
        velocities: &[f64],
        accelerations: &[f64],
    ) {
        let motion = FlatMotion::new(rotations, velocities, accelerations);
        self.debug_check_flat(forces, v0, a0, &motion);

        self.scratch.run(
            &self.offsets,
            &self.inertias,
            &self.topology,
            SpatialVec::from_slice(v0),
            SpatialVec::from_slice(a0),
            &motion,
        );
        self.write_forces(forces);
    }

    /// Solve treating the skeleton as a chain, whatever topology it was
    /// built with. Same buffers as [`solve`](Self::solve).
    pub fn solve_chain(
        &mut self,
        forces: &mut [f64],
        v0: &[f64],
        a0: &[f64],
        rotations: &[f64],
        velocities: &[f64],
        accelerations: &[f64],
    ) {
        let motion = FlatMotion::new(rotations, velocities, accelerations);
        self.debug_check_flat(forces, v0, a0, &motion);

        self.scratch.run(
            &self.offsets,
            &self.inertias,
            &Topology::Chain,
            SpatialVec::from_slice(v0),
            SpatialVec::from_slice(a0),
            &motion,
        );
        self.write_forces(forces);
    }

    /// Solve from typed joint motion; returns one spatial force per joint.
    pub fn solve_motion(
        &mut self,
        v0: &SpatialVec,
        a0: &SpatialVec,
        joints: &[JointMotion],
    ) -> &[SpatialVec] {
        debug_assert!(
            joints.len() >= self.joint_count(),
            "need motion for {} joints, got {}",
            self.joint_count(),
            joints.len()
        );
        self.scratch.run(&self.offsets, &self.inertias, &self.topology, *v0, *a0, joints);
        &self.scratch.forces
    }

    /// Spatial forces from the last solve, one per joint.
    pub fn forces(&self) -> &[SpatialVec] {
        &self.scratch.forces
    }

    /// Body velocities from the last solve; index 0 is the base.
    pub fn velocities(&self) -> &[SpatialVec] {
        &self.scratch.vel
    }

    /// Body accelerations from the last solve; index 0 is the base.
    pub fn accelerations(&self) -> &[SpatialVec] {
        &self.scratch.acc
    }

    /// Parent-to-child transforms from the last solve, one per joint.
    pub fn transforms(&self) -> &[SpatialTransform] {
        &self.scratch.x_tree
    }

    fn write_forces(&self, out: &mut [f64]) {
        for (j, f) in self.scratch.forces.iter().enumerate() {
            f.write_to_slice(&mut out[record(j, SPATIAL_STRIDE)]);
        }
    }

    fn debug_check_flat(&self, forces: &[f64], v0: &[f64], a0: &[f64], motion: &FlatMotion<'_>) {
        let n = self.joint_count();
        debug_assert!(forces.len() >= n * SPATIAL_STRIDE, "forces buffer too small");
        debug_assert!(v0.len() >= SPATIAL_STRIDE, "base velocity needs 6 floats");
        debug_assert!(a0.len() >= SPATIAL_STRIDE, "base acceleration needs 6 floats");
        debug_assert!(
            motion.joint_capacity() >= n,
            "joint buffers need {} quaternion and {} angular floats",
            n * QUAT_STRIDE,
            n * ANGULAR_STRIDE
        );
    }
}

fn check_len(name: &'static str, buf: &[f64], expected: usize) -> Result<()> {
    if buf.len() < expected {
        return Err(RneaError::BufferTooSmall {
            name,
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}
