//! Mesh construction utilities.
//!
//! This module builds half-edge meshes from face-vertex lists, the form most
//! loaders produce, and converts them back.

use nalgebra::Point3;

use super::halfedge::Mesh;
use super::index::{MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// Triangles are added in order, so a face that repeats an ordered edge of an
/// earlier face fails with [`MeshError::DuplicateEdge`].
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Example
/// ```
/// use loopmesh::mesh::{build_from_triangles, Mesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_triangles(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<Mesh<I>> {
    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex {
                    face: fi,
                    vertex: vi,
                });
            }
        }
    }

    let mut mesh = Mesh::with_capacity(vertices.len(), faces.len());

    let vertex_ids: Vec<VertexId<I>> = vertices
        .iter()
        .map(|&pos| mesh.add_vertex(pos))
        .collect();

    for face in faces {
        mesh.add_triangle(
            vertex_ids[face[0]],
            vertex_ids[face[1]],
            vertex_ids[face[2]],
        )?;
    }

    Ok(mesh)
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// All vertices are kept (isolated ones included) so vertex indices stay
/// stable; faces are listed in triangle creation order.
pub fn to_face_vertex<I: MeshIndex>(mesh: &Mesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertices().map(|v| v.position).collect();

    let faces: Vec<[usize; 3]> = mesh
        .triangle_ids()
        .map(|t| {
            let [v0, v1, v2] = mesh.triangle_vertices(t);
            [v0.index(), v1.index(), v2.index()]
        })
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tetrahedron() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];

        let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
        assert_eq!(mesh.num_triangles(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert!(mesh.halfedges().all(|(_, he)| !he.is_boundary()));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 5]];

        let result: Result<Mesh> = build_from_triangles(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 5 })
        ));
    }

    #[test]
    fn test_inconsistent_winding_rejected() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        // Second face walks 0->1 again instead of 1->0
        let faces = vec![[0, 1, 2], [0, 1, 3]];

        let result: Result<Mesh> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::DuplicateEdge { .. })));
    }

    #[test]
    fn test_face_vertex_round_trip() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3]];

        let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
        let (out_vertices, out_faces) = to_face_vertex(&mesh);

        assert_eq!(out_vertices, vertices);
        assert_eq!(out_faces, faces);
    }
}
