//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation and related types
//! for representing and editing triangle meshes.
//!
//! # Overview
//!
//! The primary type is [`Mesh`], which owns every vertex, half-edge, and
//! triangle in arenas. Elements refer to each other by index only, so
//! removing a triangle never leaves a dangling reference behind.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex (stable, never reused)
//! - [`HalfEdgeId`] - Identifies a half-edge (arena slot, recycled)
//! - [`TriangleId`] - Identifies a triangle (monotonic, never reused)
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait).
//!
//! # Construction
//!
//! Meshes are built incrementally or from face-vertex lists:
//!
//! ```
//! use loopmesh::mesh::Mesh;
//! use nalgebra::Point3;
//!
//! let mut mesh: Mesh = Mesh::new();
//! let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
//! let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
//! let c = mesh.add_vertex(Point3::new(0.5, 1.0, 0.0));
//! mesh.add_triangle(a, b, c).unwrap();
//!
//! assert_eq!(mesh.num_halfedges(), 3);
//! assert!(mesh.get_edge(a, b).is_some());
//! ```

mod builder;
mod halfedge;
mod index;

pub use builder::{build_from_triangles, to_face_vertex};
pub use halfedge::{Fan, HalfEdge, Mesh, Triangle, Vertex};
pub use index::{HalfEdgeId, MeshIndex, TriangleId, VertexId};
