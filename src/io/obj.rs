//! Wavefront OBJ format support, extended with crease lines.
//!
//! Recognized lines:
//!
//! | Line | Meaning |
//! |------|---------|
//! | `v x y z` | vertex position |
//! | `f a b c ...` | face, 1-based (negative = relative); `a/t/n` tokens accepted; polygons are fan-triangulated |
//! | `e a b w` | crease weight `w` on edge `(a, b)`, 0-based; `inf` means 1e6 |
//!
//! Comments and `vt`, `vn`, `g`, `o`, `s`, `usemtl`, `mtllib` lines are
//! ignored. Any other line is logged and skipped.
//!
//! # Example
//!
//! ```
//! use loopmesh::io::obj;
//! use loopmesh::mesh::Mesh;
//!
//! let source = "\
//! v 0 0 0
//! v 1 0 0
//! v 0 1 0
//! v 1 1 0
//! f 1 2 3
//! f 3 2 4
//! e 1 2 inf
//! ";
//! let mesh: Mesh = obj::parse(source).unwrap();
//! assert_eq!(mesh.num_triangles(), 2);
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{Mesh, MeshIndex, VertexId};

/// Crease weight written as `inf`.
pub const INFINITE_CREASE: f64 = 1_000_000.0;

fn parse_error(line: usize, message: impl Into<String>) -> MeshError {
    MeshError::Parse {
        line,
        message: message.into(),
    }
}

/// Parse OBJ source text into a mesh.
///
/// # Errors
///
/// Returns [`MeshError::Parse`] with the 1-based line number for malformed
/// numbers, out-of-range indices, or faces and creases the mesh rejects.
pub fn parse<I: MeshIndex>(source: &str) -> Result<Mesh<I>> {
    let mut mesh = Mesh::new();

    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let mut tokens = raw.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let mut coords = [0.0; 3];
                for c in &mut coords {
                    let token = tokens
                        .next()
                        .ok_or_else(|| parse_error(line, "vertex needs 3 coordinates"))?;
                    *c = token
                        .parse()
                        .map_err(|_| parse_error(line, format!("invalid coordinate '{}'", token)))?;
                }
                mesh.add_vertex(Point3::new(coords[0], coords[1], coords[2]));
            }
            "f" => {
                let corners = tokens
                    .map(|t| face_index(t, line, mesh.num_vertices()))
                    .collect::<Result<Vec<VertexId<I>>>>()?;
                if corners.len() < 3 {
                    return Err(parse_error(line, "face needs at least 3 vertices"));
                }
                for k in 1..corners.len() - 1 {
                    mesh.add_triangle(corners[0], corners[k], corners[k + 1])
                        .map_err(|e| parse_error(line, e.to_string()))?;
                }
            }
            "e" => {
                let a = crease_index(tokens.next(), line, mesh.num_vertices())?;
                let b = crease_index(tokens.next(), line, mesh.num_vertices())?;
                let weight = crease_weight(tokens.next(), line)?;
                mesh.set_crease(a, b, weight)
                    .map_err(|e| parse_error(line, e.to_string()))?;
            }
            "vt" | "vn" | "g" | "o" | "s" | "usemtl" | "mtllib" => {}
            k if k.starts_with('#') => {}
            _ => log::warn!("line {}: skipping '{}'", line, raw.trim()),
        }
    }

    Ok(mesh)
}

/// Resolve a face token (`7`, `7/1`, `7//3`, `-1`) to a vertex id.
fn face_index<I: MeshIndex>(token: &str, line: usize, num_vertices: usize) -> Result<VertexId<I>> {
    let index_str = token.split('/').next().unwrap_or(token);
    let index: i64 = index_str
        .parse()
        .map_err(|_| parse_error(line, format!("invalid face index '{}'", token)))?;

    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => num_vertices as i64 + i,
        _ => return Err(parse_error(line, "face indices are 1-based")),
    };
    if resolved < 0 || resolved as usize >= num_vertices {
        return Err(parse_error(
            line,
            format!("face index {} out of range", index),
        ));
    }
    Ok(VertexId::new(resolved as usize))
}

fn crease_index<I: MeshIndex>(
    token: Option<&str>,
    line: usize,
    num_vertices: usize,
) -> Result<VertexId<I>> {
    let token = token.ok_or_else(|| parse_error(line, "crease needs 2 vertices and a weight"))?;
    let index: usize = token
        .parse()
        .map_err(|_| parse_error(line, format!("invalid crease index '{}'", token)))?;
    if index >= num_vertices {
        return Err(parse_error(
            line,
            format!("crease index {} out of range", index),
        ));
    }
    Ok(VertexId::new(index))
}

fn crease_weight(token: Option<&str>, line: usize) -> Result<f64> {
    match token {
        Some("inf") => Ok(INFINITE_CREASE),
        Some(t) => t
            .parse()
            .map_err(|_| parse_error(line, format!("invalid crease weight '{}'", t))),
        None => Err(parse_error(line, "crease needs a weight")),
    }
}

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use loopmesh::io::obj;
/// use loopmesh::mesh::Mesh;
///
/// let mesh: Mesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let mesh = parse(&source)?;
    log::info!(
        "Loaded {} vertices, {} triangles from {}",
        mesh.num_vertices(),
        mesh.num_triangles(),
        path.display()
    );
    Ok(mesh)
}

/// Write a mesh as OBJ text.
///
/// Every vertex is written, isolated ones included, so indices survive a
/// round trip. Creased edges are written once each as `e` lines.
pub fn write<W: Write, I: MeshIndex>(mesh: &Mesh<I>, mut writer: W) -> Result<()> {
    writeln!(
        writer,
        "# {} vertices, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    )?;

    for v in mesh.vertices() {
        let p = v.position;
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    for t in mesh.triangle_ids() {
        let [a, b, c] = mesh.triangle_vertices(t);
        writeln!(writer, "f {} {} {}", a.index() + 1, b.index() + 1, c.index() + 1)?;
    }

    for (_, he) in mesh.halfedges() {
        if he.is_creased() && !he.is_boundary() && he.start < he.end {
            writeln!(writer, "e {} {} {}", he.start.index(), he.end.index(), he.crease)?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Save a mesh to an OBJ file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &Mesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write(mesh, BufWriter::new(file))?;
    log::info!("Saved {} triangles to {}", mesh.num_triangles(), path.display());
    Ok(())
}
