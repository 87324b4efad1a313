//! Error types for loopmesh.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A vertex index does not refer to a vertex of the mesh.
    #[error("vertex {vertex} does not exist")]
    InvalidVertex {
        /// The offending vertex index.
        vertex: usize,
    },

    /// A triangle id does not refer to a live triangle.
    #[error("triangle {triangle} does not exist")]
    InvalidTriangle {
        /// The offending triangle id.
        triangle: usize,
    },

    /// A triangle was requested with a repeated vertex.
    #[error("triangle ({a}, {b}, {c}) is degenerate (repeats a vertex)")]
    DegenerateTriangle {
        /// First vertex.
        a: usize,
        /// Second vertex.
        b: usize,
        /// Third vertex.
        c: usize,
    },

    /// The ordered pair is already owned by another triangle.
    ///
    /// This is either a caller bug or non-manifold input.
    #[error("half-edge ({start} -> {end}) already exists")]
    DuplicateEdge {
        /// Start vertex of the pair.
        start: usize,
        /// End vertex of the pair.
        end: usize,
    },

    /// A crease was set on an edge that is not present in both directions.
    #[error("edge ({a}, {b}) is not present in both directions")]
    MissingEdge {
        /// First vertex.
        a: usize,
        /// Second vertex.
        b: usize,
    },

    /// A parent pair already has a midpoint child in the current pass.
    #[error("vertices ({a}, {b}) already have a child vertex")]
    DuplicateChild {
        /// First parent.
        a: usize,
        /// Second parent.
        b: usize,
    },

    /// The mesh needs more slots than its index type can address.
    #[error("{kind} index would exceed {limit}")]
    IndexOverflow {
        /// Which arena ran out.
        kind: &'static str,
        /// Largest representable index.
        limit: usize,
    },

    /// A face in loader input references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// The mesh violates one of its structural invariants.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed loader input.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create an invalid state error from anything displayable.
    pub(crate) fn invalid_state<T: std::fmt::Display>(details: T) -> Self {
        MeshError::InvalidState(details.to_string())
    }
}
