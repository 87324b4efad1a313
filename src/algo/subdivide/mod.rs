//! Mesh subdivision.
//!
//! # Loop Subdivision
//!
//! Loop subdivision (Loop, 1987) is an approximating subdivision scheme for
//! triangle meshes. Each pass:
//!
//! 1. Computes a smoothed position for every original vertex from its ring
//! 2. Inserts one new vertex per undirected edge
//! 3. Replaces each triangle with 4 smaller triangles
//!
//! Smoothed positions are buffered and applied only after every new edge
//! vertex has been placed, so all rules read the pre-pass geometry.
//!
//! Creased edges are treated as feature lines: their edge vertex sits at the
//! exact midpoint, their endpoints use the sharper crease rule, and the crease
//! weight is handed down to both child edges.
//!
//! # Example
//!
//! ```
//! use loopmesh::prelude::*;
//! use loopmesh::algo::subdivide::{loop_subdivide, SubdivideOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mut mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let report = loop_subdivide(&mut mesh, &SubdivideOptions::new(2)).unwrap();
//! assert_eq!(report.triangles, 64);
//! ```
//!
//! # References
//!
//! - Loop, C. (1987). "Smooth Subdivision Surfaces Based on Triangles."
//!   Master's thesis, University of Utah.

mod loop_subdivision;

pub use loop_subdivision::{loop_beta, loop_subdivide, loop_subdivide_with_progress};

/// Options for subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision passes.
    pub iterations: usize,

    /// Whether to compute smoothed positions in parallel (default: true).
    ///
    /// Only the read-only smoothing step runs on the thread pool; all mesh
    /// mutation happens on the calling thread.
    pub parallel: bool,
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SubdivideOptions {
    /// Create options with the specified number of passes.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            parallel: true,
        }
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Summary of a subdivision run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubdivisionReport {
    /// Passes performed.
    pub iterations: usize,
    /// Triangle count before the first pass.
    pub original_triangles: usize,
    /// Triangle count after the last pass.
    pub triangles: usize,
    /// Edge vertices created over all passes.
    pub new_vertices: usize,
    /// Triangles left untouched because an edge vertex was missing.
    pub skipped_triangles: usize,
}
