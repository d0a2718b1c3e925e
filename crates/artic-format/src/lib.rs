//! Skeleton description format for artic.
//!
//! A `.artic.json` file lists joints parents-first, each with its offset in
//! the parent frame and the mass properties of the body it drives. Loading
//! one yields a ready [`RneaSolver`](artic_rigid::RneaSolver).

pub mod error;
pub mod skeleton;

pub use error::{FormatError, Result};
pub use skeleton::{
    JointSpec, SkeletonSpec, export_skeleton, load_skeleton, parse_skeleton, save_skeleton,
};
