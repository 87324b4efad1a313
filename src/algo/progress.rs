//! Progress callbacks for subdivision and simplification.
//!
//! ```
//! use loopmesh::algo::Progress;
//! use loopmesh::algo::subdivide::{loop_subdivide_with_progress, SubdivideOptions};
//! use loopmesh::mesh::Mesh;
//!
//! let progress = Progress::new(|pass, passes, message| {
//!     println!("[{}/{}] {}", pass, passes, message);
//! });
//!
//! let mut mesh: Mesh = Mesh::new();
//! loop_subdivide_with_progress(&mut mesh, &SubdivideOptions::new(2), &progress).unwrap();
//! ```

/// Receives `(done, total, message)` updates from a running algorithm.
///
/// `done == total` marks the final update.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Wrap a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Forward one update to the callback.
    #[inline]
    pub fn report(&self, done: usize, total: usize, message: &str) {
        (self.callback)(done, total, message);
    }

    /// A reporter that ignores every update.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
