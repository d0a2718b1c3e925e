//! Featherstone inverse dynamics for ball-jointed skeletons.
//!
//! Implements the Recursive Newton-Euler Algorithm (RNEA) over either a
//! branching joint tree or a simple chain. Body 0 is always the fixed base;
//! joint `j` drives body `j + 1`.
//!
//! External (non-joint) forces such as contacts or an explicit gravity
//! wrench are not modelled: the solver only resolves the joint forces that
//! the commanded motion requires. Gravity can still be folded in the usual
//! Featherstone way by giving the base an upward acceleration.

pub mod builder;
pub mod error;
pub mod layout;
pub mod motion;
pub mod rnea;
pub mod topology;

pub use builder::RneaSolverBuilder;
pub use error::{Result, RneaError};
pub use motion::{FlatMotion, JointMotion, MotionSource};
pub use rnea::RneaSolver;
pub use topology::Topology;
