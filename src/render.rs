//! Read-only queries for a renderer.
//!
//! A renderer never walks the mesh while it is being edited. Instead it takes
//! a [`MeshSnapshot`], an owned copy of everything it draws, and uploads that.
//!
//! ```
//! use loopmesh::prelude::*;
//! use loopmesh::render::ShadingMode;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh: Mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//!
//! let snapshot = mesh.snapshot(ShadingMode::Flat);
//! assert_eq!(snapshot.triangle_vertices.len(), 3);
//! assert_eq!(snapshot.boundary_edges.len(), 3);
//! ```

use bytemuck::{Pod, Zeroable};
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::mesh::{HalfEdgeId, Mesh, MeshIndex, TriangleId, VertexId};

/// How triangle normals are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingMode {
    /// One face normal for all three corners.
    #[default]
    Flat,
    /// Per-vertex normals averaged from incident faces.
    Smooth,
}

/// A triangle corner ready for upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    /// Corner position.
    pub position: [f32; 3],
    /// Shading normal.
    pub normal: [f32; 3],
}

/// Classification of an edge for line rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// The half-edge has no opposite.
    Boundary,
    /// Interior edge with a positive crease weight.
    Crease,
    /// Any other interior edge.
    Plain,
}

/// Edges grouped by [`EdgeKind`], as vertex pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeClasses<I: MeshIndex = u32> {
    /// One entry per boundary half-edge, in its direction.
    pub boundary: Vec<(VertexId<I>, VertexId<I>)>,
    /// One entry per creased undirected edge.
    pub crease: Vec<(VertexId<I>, VertexId<I>)>,
    /// One entry per plain undirected edge.
    pub plain: Vec<(VertexId<I>, VertexId<I>)>,
}

/// Line segment between two positions.
pub type Segment = [[f32; 3]; 2];

/// Owned copy of everything needed to draw a mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshSnapshot {
    /// Three corners per live triangle, in triangle order.
    pub triangle_vertices: Vec<RenderVertex>,
    /// Positions of all non-isolated vertices.
    pub positions: Vec<[f32; 3]>,
    /// Boundary segments.
    pub boundary_edges: Vec<Segment>,
    /// Crease segments.
    pub crease_edges: Vec<Segment>,
    /// Remaining interior segments.
    pub plain_edges: Vec<Segment>,
}

fn to_f32(p: &Point3<f64>) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

fn normal_to_f32(n: &Vector3<f64>) -> [f32; 3] {
    [n.x as f32, n.y as f32, n.z as f32]
}

impl<I: MeshIndex> Mesh<I> {
    /// Classify a half-edge. Boundary takes precedence over crease.
    pub fn edge_kind(&self, he: HalfEdgeId<I>) -> EdgeKind {
        let edge = self.halfedge(he);
        if edge.is_boundary() {
            EdgeKind::Boundary
        } else if edge.is_creased() {
            EdgeKind::Crease
        } else {
            EdgeKind::Plain
        }
    }

    /// Group all edges by kind.
    ///
    /// Interior edges are reported once, from the half-edge whose start index
    /// is smaller.
    pub fn classify_edges(&self) -> EdgeClasses<I> {
        let mut classes = EdgeClasses {
            boundary: Vec::new(),
            crease: Vec::new(),
            plain: Vec::new(),
        };
        for (id, he) in self.halfedges() {
            let pair = (he.start, he.end);
            match self.edge_kind(id) {
                EdgeKind::Boundary => classes.boundary.push(pair),
                EdgeKind::Crease if he.start < he.end => classes.crease.push(pair),
                EdgeKind::Plain if he.start < he.end => classes.plain.push(pair),
                _ => {}
            }
        }
        classes
    }

    /// Unit normals of every live triangle, in triangle order.
    pub fn face_normals(&self) -> Vec<(TriangleId<I>, Vector3<f64>)> {
        let ids: Vec<TriangleId<I>> = self.triangle_ids().collect();
        ids.into_par_iter()
            .map(|t| (t, self.face_normal(t)))
            .collect()
    }

    /// Smooth normals for every vertex: the normalized sum of the unit normals
    /// of incident triangles. Isolated vertices get a zero vector.
    pub fn vertex_normals(&self) -> Vec<Vector3<f64>> {
        let mut normals = vec![Vector3::zeros(); self.num_vertices()];
        for (t, n) in self.face_normals() {
            for v in self.triangle_vertices(t) {
                normals[v.index()] += n;
            }
        }
        for n in &mut normals {
            *n = n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
        }
        normals
    }

    /// Smooth normal of a single vertex.
    pub fn vertex_normal(&self, v: VertexId<I>) -> Vector3<f64> {
        let sum: Vector3<f64> = self
            .triangle_ids()
            .filter(|&t| self.triangle_vertices(t).contains(&v))
            .map(|t| self.face_normal(t))
            .sum();
        sum.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
    }

    /// Take an owned snapshot of the mesh for drawing.
    pub fn snapshot(&self, mode: ShadingMode) -> MeshSnapshot {
        let smooth = match mode {
            ShadingMode::Smooth => Some(self.vertex_normals()),
            ShadingMode::Flat => None,
        };

        let mut triangle_vertices = Vec::with_capacity(self.num_triangles() * 3);
        for (t, face_normal) in self.face_normals() {
            for v in self.triangle_vertices(t) {
                let normal = match &smooth {
                    Some(normals) => normals[v.index()],
                    None => face_normal,
                };
                triangle_vertices.push(RenderVertex {
                    position: to_f32(self.position(v)),
                    normal: normal_to_f32(&normal),
                });
            }
        }

        let positions = self
            .vertex_ids()
            .filter(|&v| !self.is_isolated(v))
            .map(|v| to_f32(self.position(v)))
            .collect();

        let classes = self.classify_edges();
        let segments = |pairs: &[(VertexId<I>, VertexId<I>)]| -> Vec<Segment> {
            pairs
                .iter()
                .map(|&(a, b)| [to_f32(self.position(a)), to_f32(self.position(b))])
                .collect()
        };

        MeshSnapshot {
            triangle_vertices,
            positions,
            boundary_edges: segments(&classes.boundary),
            crease_edges: segments(&classes.crease),
            plain_edges: segments(&classes.plain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;

    fn create_tetrahedron() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn create_two_triangles() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [2, 1, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_classify_edges() {
        let mut mesh = create_two_triangles();
        let classes = mesh.classify_edges();
        assert_eq!(classes.boundary.len(), 4);
        assert_eq!(classes.plain.len(), 1);
        assert!(classes.crease.is_empty());

        mesh.set_crease(VertexId::new(1), VertexId::new(2), 1.0).unwrap();
        let classes = mesh.classify_edges();
        assert_eq!(classes.crease, vec![(VertexId::new(1), VertexId::new(2))]);
        assert!(classes.plain.is_empty());
    }

    #[test]
    fn test_edge_kind_boundary_wins() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh: Mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        for he in mesh.halfedge_ids() {
            assert_eq!(mesh.edge_kind(he), EdgeKind::Boundary);
        }
    }

    #[test]
    fn test_closed_mesh_edges() {
        let mesh = create_tetrahedron();
        let classes = mesh.classify_edges();
        assert!(classes.boundary.is_empty());
        assert_eq!(classes.plain.len(), 6);
    }

    #[test]
    fn test_flat_snapshot() {
        let mesh = create_two_triangles();
        let snapshot = mesh.snapshot(ShadingMode::Flat);

        assert_eq!(snapshot.triangle_vertices.len(), 6);
        assert_eq!(snapshot.positions.len(), 4);
        assert_eq!(snapshot.boundary_edges.len(), 4);
        assert_eq!(snapshot.plain_edges.len(), 1);
        for rv in &snapshot.triangle_vertices {
            assert_eq!(rv.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_smooth_normals_are_unit() {
        let mesh = create_tetrahedron();
        let snapshot = mesh.snapshot(ShadingMode::Smooth);

        assert_eq!(snapshot.triangle_vertices.len(), 12);
        for rv in &snapshot.triangle_vertices {
            let n = Vector3::new(rv.normal[0], rv.normal[1], rv.normal[2]);
            assert!((n.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_vertex_normal_matches_bulk() {
        let mesh = create_tetrahedron();
        let bulk = mesh.vertex_normals();
        for v in mesh.vertex_ids() {
            assert!((mesh.vertex_normal(v) - bulk[v.index()]).norm() < 1e-12);
        }
    }

    #[test]
    fn test_isolated_vertex_excluded() {
        let mut mesh = create_two_triangles();
        let lonely = mesh.add_vertex(Point3::new(5.0, 5.0, 5.0));

        let snapshot = mesh.snapshot(ShadingMode::Smooth);
        assert_eq!(snapshot.positions.len(), 4);
        assert_eq!(mesh.vertex_normal(lonely), Vector3::zeros());
    }

    #[test]
    fn test_render_vertex_is_plain_data() {
        let vertices = [RenderVertex {
            position: [1.0, 2.0, 3.0],
            normal: [0.0, 0.0, 1.0],
        }];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 24);
    }
}
