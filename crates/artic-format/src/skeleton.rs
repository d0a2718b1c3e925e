//! Skeleton schema and loader.

use crate::error::{FormatError, Result};
use artic_math::{Mat3, SpatialInertia, Vec3, mat3_write_row_slice};
use artic_rigid::layout::{INERTIA_STRIDE, TRANSLATION_STRIDE, record};
use artic_rigid::{RneaSolver, RneaSolverBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Top-level skeleton description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonSpec {
    /// Format version.
    pub version: String,
    /// Skeleton name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Joints, parents before children.
    pub joints: Vec<JointSpec>,
}

/// One ball joint and the body it drives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    pub name: String,
    /// Index of the parent joint, -1 for the base.
    #[serde(default = "default_parent")]
    pub parent: i32,
    /// Joint origin in the parent body frame.
    #[serde(default)]
    pub offset: [f64; 3],
    /// Body mass.
    pub mass: f64,
    /// Body centre of mass in the body frame.
    #[serde(default)]
    pub com: [f64; 3],
    /// Rotational inertia about the centre of mass, row-major.
    #[serde(default)]
    pub inertia: [f64; 9],
}

fn default_parent() -> i32 {
    -1
}

impl JointSpec {
    pub fn spatial_inertia(&self) -> SpatialInertia {
        SpatialInertia::from_rotational_inertia_mass_offset(
            Mat3::from_row_slice(&self.inertia),
            Vec3::from(self.com),
            self.mass,
        )
    }

    fn from_parts(name: &str, parent: i32, offset: &Vec3, si: &SpatialInertia) -> Self {
        let mut inertia = [0.0; 9];
        mat3_write_row_slice(&si.inertia, &mut inertia);
        Self {
            name: name.to_string(),
            parent,
            offset: [offset.x, offset.y, offset.z],
            mass: si.mass,
            com: [si.com.x, si.com.y, si.com.z],
            inertia,
        }
    }
}

impl SkeletonSpec {
    /// Describe an existing solver's skeleton.
    pub fn from_solver(name: &str, solver: &RneaSolver) -> Self {
        let parents = solver.topology().parents(solver.joint_count());
        let joints = solver
            .joint_names()
            .iter()
            .zip(parents)
            .zip(solver.offsets().iter().zip(solver.inertias()))
            .map(|((n, p), (r, si))| JointSpec::from_parts(n, p, r, si))
            .collect();
        Self {
            version: "1".to_string(),
            name: name.to_string(),
            description: String::new(),
            joints,
        }
    }

    /// Structural checks. Suspicious but usable mass data is only logged.
    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() {
            return Err(FormatError::MissingField("version".to_string()));
        }
        if self.joints.is_empty() {
            return Err(FormatError::InvalidFormat(format!(
                "skeleton '{}' has no joints",
                self.name
            )));
        }
        let mut seen = HashSet::new();
        for joint in &self.joints {
            if !seen.insert(joint.name.as_str()) {
                return Err(FormatError::InvalidFormat(format!(
                    "duplicate joint name '{}'",
                    joint.name
                )));
            }
            if joint.mass <= 0.0 {
                tracing::warn!("Joint '{}' drives a body with mass {}", joint.name, joint.mass);
            }
            let i = Mat3::from_row_slice(&joint.inertia);
            if (i - i.transpose()).iter().any(|d| d.abs() > 1e-9) {
                tracing::warn!("Joint '{}' has an asymmetric inertia tensor", joint.name);
            }
        }
        Ok(())
    }

    /// Parent index of every joint.
    pub fn parents(&self) -> Vec<i32> {
        self.joints.iter().map(|j| j.parent).collect()
    }

    /// Joint offsets in the flat layout, 3 floats per joint.
    pub fn flat_translations(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.joints.len() * TRANSLATION_STRIDE];
        for (j, joint) in self.joints.iter().enumerate() {
            out[record(j, TRANSLATION_STRIDE)].copy_from_slice(&joint.offset);
        }
        out
    }

    /// Spatial inertias in the flat layout, 13 floats per joint.
    pub fn flat_inertias(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.joints.len() * INERTIA_STRIDE];
        for (j, joint) in self.joints.iter().enumerate() {
            joint
                .spatial_inertia()
                .write_to_slice(&mut out[record(j, INERTIA_STRIDE)]);
        }
        out
    }

    /// Validate and build a solver for this skeleton.
    pub fn to_solver(&self) -> Result<RneaSolver> {
        self.validate()?;
        let builder = self.joints.iter().fold(RneaSolverBuilder::new(), |b, j| {
            b.add_joint(&j.name, j.parent, Vec3::from(j.offset), j.spatial_inertia())
        });
        Ok(builder.build()?)
    }
}

/// Parse a skeleton from a JSON string.
pub fn parse_skeleton(json: &str) -> Result<SkeletonSpec> {
    let spec: SkeletonSpec = serde_json::from_str(json)?;
    spec.validate()?;
    Ok(spec)
}

/// Load a skeleton from file.
pub fn load_skeleton(path: impl AsRef<Path>) -> Result<SkeletonSpec> {
    let json = std::fs::read_to_string(path)?;
    parse_skeleton(&json)
}

/// Export a skeleton to a JSON string.
pub fn export_skeleton(spec: &SkeletonSpec) -> Result<String> {
    Ok(serde_json::to_string_pretty(spec)?)
}

/// Save a skeleton to file.
pub fn save_skeleton(path: impl AsRef<Path>, spec: &SkeletonSpec) -> Result<()> {
    std::fs::write(path, export_skeleton(spec)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use artic_rigid::Topology;

    const ARM: &str = r#"{
        "version": "1",
        "name": "arm",
        "joints": [
            { "name": "shoulder", "mass": 2.0,
              "inertia": [0.1, 0, 0, 0, 0.02, 0, 0, 0, 0.1],
              "com": [0, -0.15, 0] },
            { "name": "elbow", "parent": 0, "offset": [0, -0.3, 0], "mass": 1.0,
              "inertia": [0.05, 0, 0, 0, 0.01, 0, 0, 0, 0.05] },
            { "name": "thumb", "parent": 1, "offset": [0.02, -0.25, 0], "mass": 0.05 },
            { "name": "finger", "parent": 1, "offset": [-0.02, -0.25, 0], "mass": 0.05 }
        ]
    }"#;

    #[test]
    fn test_parse_defaults() {
        let spec = parse_skeleton(ARM).unwrap();
        assert_eq!(spec.joints.len(), 4);
        assert_eq!(spec.joints[0].parent, -1);
        assert_eq!(spec.joints[0].offset, [0.0; 3]);
        assert_eq!(spec.joints[1].com, [0.0; 3]);
        assert_eq!(spec.joints[2].inertia, [0.0; 9]);
        assert_eq!(spec.parents(), vec![-1, 0, 1, 1]);
    }

    #[test]
    fn test_to_solver_builds_tree() {
        let solver = parse_skeleton(ARM).unwrap().to_solver().unwrap();
        assert_eq!(solver.joint_count(), 4);
        assert_eq!(
            solver.topology(),
            &Topology::Tree {
                parents: vec![-1, 0, 1, 1]
            }
        );
        assert_eq!(solver.joint_index("finger"), Some(3));
        assert_relative_eq!(solver.inertias()[0].com.y, -0.15);
    }

    #[test]
    fn test_flat_layout() {
        let spec = parse_skeleton(ARM).unwrap();
        let r = spec.flat_translations();
        assert_eq!(r.len(), 12);
        assert_eq!(&r[3..6], &[0.0, -0.3, 0.0]);
        let i = spec.flat_inertias();
        assert_eq!(i.len(), 52);
        assert_eq!(i[12], 2.0);
        assert_eq!(i[INERTIA_STRIDE + 12], 1.0);
    }

    #[test]
    fn test_missing_version() {
        let json = ARM.replace(r#""version": "1""#, r#""version": """#);
        assert!(matches!(
            parse_skeleton(&json),
            Err(FormatError::MissingField(f)) if f == "version"
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let json = ARM.replace(r#""name": "thumb""#, r#""name": "finger""#);
        assert!(matches!(
            parse_skeleton(&json),
            Err(FormatError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_bad_parent_surfaces_solver_error() {
        let json = ARM.replace(r#""parent": 0"#, r#""parent": 3"#);
        let spec = parse_skeleton(&json).unwrap();
        assert!(matches!(spec.to_solver(), Err(FormatError::Solver(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_skeleton("{ not json"),
            Err(FormatError::JsonError(_))
        ));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let spec = parse_skeleton(ARM).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arm.artic.json");
        save_skeleton(&path, &spec).unwrap();
        assert_eq!(load_skeleton(&path).unwrap(), spec);
    }

    #[test]
    fn test_from_solver_describes_skeleton() {
        let spec = parse_skeleton(ARM).unwrap();
        let solver = spec.to_solver().unwrap();
        let described = SkeletonSpec::from_solver("arm", &solver);
        assert_eq!(described.joints, spec.joints);
    }
}
