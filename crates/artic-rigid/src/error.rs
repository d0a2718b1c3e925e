//! Construction errors for the RNEA solver.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RneaError {
    #[error("model has no joints")]
    EmptyModel,

    #[error("joint {joint} has parent {parent}; a parent must be -1 or a lower joint index")]
    NonTopologicalParent { joint: usize, parent: i32 },

    #[error("expected {expected} {what}, got {actual}")]
    CountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("buffer `{name}` holds {actual} floats, needs at least {expected}")]
    BufferTooSmall {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, RneaError>;
