//! artic: spatial-algebra inverse dynamics for articulated figures.
//!
//! This is the umbrella crate: it re-exports the spatial primitives, the
//! RNEA solver and the skeleton format from the sub-crates.

pub use artic_format::{self, SkeletonSpec, load_skeleton, parse_skeleton};
pub use artic_math::{
    self, ArticulatedInertia, Quat, SpatialInertia, SpatialTransform, SpatialVec, Vec3,
};
pub use artic_rigid::{
    self, JointMotion, RneaError, RneaSolver, RneaSolverBuilder, Topology, layout,
};

/// Featherstone base acceleration that stands in for uniform gravity `g`
/// (expressed in the base frame): the base accelerates by `-g`.
///
/// Passing this as `a0` makes the solver include gravity load without an
/// external-force term.
pub fn gravity_base_acceleration(g: Vec3) -> SpatialVec {
    SpatialVec::new(Vec3::zeros(), -g)
}

/// Standard gravity (m/s²).
pub const GRAVITY: f64 = 9.81;
