//! Mesh processing algorithms.
//!
//! - **Subdivision**: Loop subdivision with crease support
//! - **Simplification**: greedy shortest-edge collapse
//!
//! Both operate in place on a [`Mesh`](crate::mesh::Mesh) and accept an
//! optional [`Progress`] reporter.

pub mod progress;
pub mod simplify;
pub mod subdivide;

pub use progress::Progress;
