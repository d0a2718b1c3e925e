//! Parent resolution for the two RNEA passes.
//!
//! The forward and backward passes are written once; a `Topology` only
//! answers "which joint is the parent of joint `j`". A tree follows an
//! explicit parent array, a chain takes the immediate predecessor.

use crate::error::{Result, RneaError};

/// Parent-index value marking a joint attached directly to the base body.
pub const BASE: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// Joint `j` hangs off joint `j - 1`; joint 0 hangs off the base.
    Chain,
    /// Joint `j` hangs off `parents[j]`, or the base when that is [`BASE`].
    Tree { parents: Vec<i32> },
}

impl Topology {
    /// Tree topology from a parent array, checked for topological order.
    pub fn tree(parents: Vec<i32>) -> Result<Self> {
        validate_parents(&parents)?;
        Ok(Topology::Tree { parents })
    }

    /// Pick the cheaper strategy for a parent array: `Chain` when every joint
    /// hangs off its predecessor, `Tree` otherwise.
    pub fn from_parents(parents: Vec<i32>) -> Result<Self> {
        validate_parents(&parents)?;
        if is_chain(&parents) {
            Ok(Topology::Chain)
        } else {
            Ok(Topology::Tree { parents })
        }
    }

    /// Check that this topology can drive `joint_count` joints.
    pub fn validate(&self, joint_count: usize) -> Result<()> {
        match self {
            Topology::Chain => Ok(()),
            Topology::Tree { parents } => {
                if parents.len() != joint_count {
                    return Err(RneaError::CountMismatch {
                        what: "parent indices",
                        expected: joint_count,
                        actual: parents.len(),
                    });
                }
                validate_parents(parents)
            }
        }
    }

    /// Parent joint of `joint`, `None` when it is attached to the base.
    #[inline]
    pub fn parent(&self, joint: usize) -> Option<usize> {
        match self {
            Topology::Chain => joint.checked_sub(1),
            Topology::Tree { parents } => usize::try_from(parents[joint]).ok(),
        }
    }

    /// Parent body of body `joint + 1`; the base is body 0.
    #[inline]
    pub fn parent_body(&self, joint: usize) -> usize {
        self.parent(joint).map_or(0, |p| p + 1)
    }

    /// Explicit parent array for `joint_count` joints.
    pub fn parents(&self, joint_count: usize) -> Vec<i32> {
        match self {
            Topology::Chain => (0..joint_count as i32).map(|j| j - 1).collect(),
            Topology::Tree { parents } => parents.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Topology::Chain => "chain",
            Topology::Tree { .. } => "tree",
        }
    }
}

fn validate_parents(parents: &[i32]) -> Result<()> {
    for (joint, &parent) in parents.iter().enumerate() {
        if parent < BASE || parent >= joint as i32 {
            return Err(RneaError::NonTopologicalParent { joint, parent });
        }
    }
    Ok(())
}

fn is_chain(parents: &[i32]) -> bool {
    parents
        .iter()
        .enumerate()
        .all(|(j, &p)| p == j as i32 - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_parents() {
        let t = Topology::Chain;
        assert_eq!(t.parent(0), None);
        assert_eq!(t.parent(3), Some(2));
        assert_eq!(t.parent_body(0), 0);
        assert_eq!(t.parent_body(3), 3);
        assert_eq!(t.parents(4), vec![-1, 0, 1, 2]);
    }

    #[test]
    fn test_tree_parents() {
        let t = Topology::tree(vec![-1, 0, 0, 2, -1]).unwrap();
        assert_eq!(t.parent(0), None);
        assert_eq!(t.parent(2), Some(0));
        assert_eq!(t.parent(3), Some(2));
        assert_eq!(t.parent(4), None);
        assert_eq!(t.parent_body(3), 3);
        assert_eq!(t.parent_body(4), 0);
    }

    #[test]
    fn test_rejects_forward_references() {
        assert_eq!(
            Topology::tree(vec![-1, 2, 0]),
            Err(RneaError::NonTopologicalParent { joint: 1, parent: 2 })
        );
        assert_eq!(
            Topology::tree(vec![0]),
            Err(RneaError::NonTopologicalParent { joint: 0, parent: 0 })
        );
        assert_eq!(
            Topology::tree(vec![-1, -3]),
            Err(RneaError::NonTopologicalParent { joint: 1, parent: -3 })
        );
    }

    #[test]
    fn test_from_parents_detects_chain() {
        assert_eq!(Topology::from_parents(vec![-1, 0, 1]).unwrap(), Topology::Chain);
        assert_eq!(
            Topology::from_parents(vec![-1, 0, 0]).unwrap(),
            Topology::Tree {
                parents: vec![-1, 0, 0]
            }
        );
    }

    #[test]
    fn test_validate_length() {
        let t = Topology::Tree {
            parents: vec![-1, 0],
        };
        assert!(t.validate(2).is_ok());
        assert!(matches!(
            t.validate(3),
            Err(RneaError::CountMismatch { expected: 3, actual: 2, .. })
        ));
        assert!(Topology::Chain.validate(7).is_ok());
    }
}
