//! Incremental construction of an [`RneaSolver`].

use crate::error::Result;
use crate::rnea::RneaSolver;
use crate::topology::{BASE, Topology};
use artic_math::{SpatialInertia, Vec3};

/// Builder for solvers, one joint (and the body it drives) at a time.
///
/// Joints must be added parents first. `build` picks the chain strategy
/// when every joint hangs off the one added just before it.
#[derive(Debug, Clone, Default)]
pub struct RneaSolverBuilder {
    names: Vec<String>,
    parents: Vec<i32>,
    offsets: Vec<Vec3>,
    inertias: Vec<SpatialInertia>,
}

impl RneaSolverBuilder {
    /// Start building a new solver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a joint attached to the given parent.
    ///
    /// `parent` is the index of the parent joint, or -1 for the base.
    /// `offset` is the joint origin in the parent body frame.
    /// `inertia` is the driven body's spatial inertia in its own frame.
    pub fn add_joint(
        mut self,
        name: &str,
        parent: i32,
        offset: Vec3,
        inertia: SpatialInertia,
    ) -> Self {
        self.names.push(name.to_string());
        self.parents.push(parent);
        self.offsets.push(offset);
        self.inertias.push(inertia);
        self
    }

    /// Add a joint attached to the most recently added joint (or the base).
    pub fn add_chain_joint(self, name: &str, offset: Vec3, inertia: SpatialInertia) -> Self {
        let parent = self.parents.len() as i32 - 1;
        self.add_joint(name, parent.max(BASE), offset, inertia)
    }

    /// Index of a joint added earlier.
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Build the solver.
    pub fn build(self) -> Result<RneaSolver> {
        let topology = Topology::from_parents(self.parents)?;
        RneaSolver::with_names(self.names, self.offsets, self.inertias, topology)
    }
}
