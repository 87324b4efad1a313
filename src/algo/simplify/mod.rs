//! Mesh simplification by greedy shortest-edge collapse.
//!
//! Candidates are half-edges ordered by length. Each step collapses the
//! shortest half-edge that passes the topology checks, which removes exactly
//! two triangles, and then restarts from the shortest remaining candidate.
//!
//! Collapsing `v -> w` moves `v` to the midpoint of the edge, deletes the
//! triangle fan around `w`, and re-triangulates the hole as a fan around `v`.
//! `w` is left isolated; vertex ids are never compacted.
//!
//! # Example
//!
//! ```
//! use loopmesh::prelude::*;
//! use loopmesh::algo::simplify::{simplify, SimplifyOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(-1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, -1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(0.0, 0.0, -1.0),
//! ];
//! let faces = vec![
//!     [0, 2, 4], [2, 1, 4], [1, 3, 4], [3, 0, 4],
//!     [2, 0, 5], [1, 2, 5], [3, 1, 5], [0, 3, 5],
//! ];
//! let mut mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let outcome = simplify(&mut mesh, &SimplifyOptions::with_target_triangles(4)).unwrap();
//! assert!(outcome.reached);
//! assert_eq!(mesh.num_triangles(), 4);
//! ```

mod edge_collapse;

pub use edge_collapse::{simplify, simplify_with_progress};

use crate::error::{MeshError, Result};

/// Options for mesh simplification.
#[derive(Debug, Clone)]
pub struct SimplifyOptions {
    /// Target number of triangles after simplification.
    /// If None, uses target_ratio instead.
    pub target_triangles: Option<usize>,

    /// Target ratio of triangles to keep (0.0 to 1.0).
    /// Only used if target_triangles is None.
    pub target_ratio: f64,
}

impl SimplifyOptions {
    /// Create options to reduce to a target number of triangles.
    pub fn with_target_triangles(target: usize) -> Self {
        Self {
            target_triangles: Some(target),
            target_ratio: 0.5,
        }
    }

    /// Create options to reduce to a ratio of the original triangle count.
    pub fn with_target_ratio(ratio: f64) -> Self {
        Self {
            target_triangles: None,
            target_ratio: ratio,
        }
    }

    /// Compute the target number of triangles given the original count.
    ///
    /// Targets above the original count are capped to it.
    pub fn compute_target(&self, original_triangles: usize) -> Result<usize> {
        if let Some(target) = self.target_triangles {
            return Ok(target.min(original_triangles));
        }
        if !(0.0..=1.0).contains(&self.target_ratio) {
            return Err(MeshError::invalid_param(
                "target_ratio",
                self.target_ratio,
                "must be in [0, 1]",
            ));
        }
        Ok(((original_triangles as f64) * self.target_ratio).round() as usize)
    }
}

/// What a simplification run achieved.
///
/// Failing to reach the target is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifyOutcome {
    /// Triangle count before simplification.
    pub original_triangles: usize,
    /// Requested triangle count.
    pub target: usize,
    /// Triangle count after simplification.
    pub achieved: usize,
    /// Number of edge collapses performed.
    pub collapses: usize,
    /// Whether `achieved` is at or below `target`.
    pub reached: bool,
}
