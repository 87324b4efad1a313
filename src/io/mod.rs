//! Mesh file I/O.
//!
//! Meshes are read and written in an extended Wavefront OBJ dialect that can
//! also carry crease weights. See [`obj`] for the exact line syntax.
//!
//! ```no_run
//! use loopmesh::io::{load, save};
//! use loopmesh::mesh::Mesh;
//!
//! let mut mesh: Mesh = load("model.obj").unwrap();
//! mesh.subdivide().unwrap();
//! save(&mesh, "output.obj").unwrap();
//! ```

pub mod obj;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{Mesh, MeshIndex};

fn check_extension(path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("obj") => Ok(()),
        other => Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: format!("unsupported format: {}", other.unwrap_or("(none)")),
        }),
    }
}

/// Load a mesh from a file, checking the extension first.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    check_extension(path)?;
    obj::load(path)
}

/// Save a mesh to a file, checking the extension first.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &Mesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    check_extension(path)?;
    obj::save(mesh, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension() {
        let result: Result<Mesh> = load("model.stl");
        assert!(matches!(result, Err(MeshError::LoadError { .. })));

        let result: Result<Mesh> = load("model");
        assert!(matches!(result, Err(MeshError::LoadError { .. })));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(check_extension(Path::new("Model.OBJ")).is_ok());
    }
}
