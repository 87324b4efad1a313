//! # loopmesh
//!
//! A half-edge triangle mesh kernel with Loop subdivision and greedy
//! edge-collapse simplification.
//!
//! ## Features
//!
//! - **Half-edge data structure**: arena storage with type-safe indices and O(1)
//!   edge lookup by vertex pair
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Loop subdivision**: crease-aware, one pass quadruples the triangle count
//! - **Simplification**: shortest-edge collapse guarded by the link condition
//! - **Render queries**: flat or smooth shaded snapshots with classified edges
//! - **OBJ I/O**: with `e` lines for crease weights
//!
//! ## Quick Start
//!
//! ```no_run
//! use loopmesh::prelude::*;
//!
//! // Load a mesh
//! let mut mesh: Mesh = loopmesh::io::load("model.obj").unwrap();
//!
//! // Refine, then coarsen back down
//! mesh.subdivide().unwrap();
//! let outcome = mesh.simplify(1000).unwrap();
//! println!("{} -> {} triangles", outcome.original_triangles, outcome.achieved);
//!
//! // Save the mesh
//! loopmesh::io::save(&mesh, "output.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use loopmesh::prelude::*;
//! use nalgebra::Point3;
//!
//! // Define vertices and faces
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! // Build the mesh
//! let mut mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_triangles(), 4);
//!
//! mesh.subdivide().unwrap();
//! assert_eq!(mesh.num_triangles(), 16);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use loopmesh::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! # let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
//! // Walk the neighbours of a vertex through its outgoing half-edges
//! let he = mesh.get_edge(VertexId::new(0), VertexId::new(1)).unwrap();
//! let fan = mesh.outgoing_fan(he);
//! for &out in &fan.halfedges {
//!     println!("Neighbor: {:?}", mesh.end(out));
//! }
//! assert!(!fan.closed);
//!
//! // Get vertices of a triangle
//! let t = mesh.halfedge(he).triangle;
//! let [v0, v1, v2] = mesh.triangle_vertices(t);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod render;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use loopmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::simplify::{SimplifyOptions, SimplifyOutcome};
    pub use crate::algo::subdivide::{SubdivideOptions, SubdivisionReport};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, HalfEdge, HalfEdgeId, Mesh, MeshIndex, Triangle,
        TriangleId, Vertex, VertexId,
    };
    pub use crate::render::{EdgeKind, MeshSnapshot, RenderVertex, ShadingMode};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
