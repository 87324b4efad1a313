//! Property-based tests for the mesh kernel.
//!
//! These tests use proptest to generate random meshes and edit sequences and
//! check the structural invariants after every operation.

use std::collections::BTreeSet;

use loopmesh::prelude::*;
use nalgebra::Point3;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Generate a random vertex position in a bounded range.
fn arb_position() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-100.0..100.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Random positions plus random (possibly invalid) triangles over them.
fn arb_soup() -> impl Strategy<Value = (Vec<Point3<f64>>, Vec<[usize; 3]>)> {
    (4usize..=12).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_position(), n),
            prop::collection::vec(prop::array::uniform3(0..n), 1..=30),
        )
    })
}

/// A triangulated height field of the given size with random heights.
fn arb_height_field() -> impl Strategy<Value = Mesh> {
    (2usize..=5).prop_flat_map(|n| {
        prop::collection::vec(-1.0..1.0f64, (n + 1) * (n + 1)).prop_map(move |heights| {
            let mut vertices = Vec::new();
            let mut faces = Vec::new();
            for j in 0..=n {
                for i in 0..=n {
                    let z = heights[j * (n + 1) + i];
                    vertices.push(Point3::new(i as f64, j as f64, z));
                }
            }
            for j in 0..n {
                for i in 0..n {
                    let v00 = j * (n + 1) + i;
                    let v10 = v00 + 1;
                    let v01 = v00 + (n + 1);
                    let v11 = v01 + 1;
                    faces.push([v00, v10, v11]);
                    faces.push([v00, v11, v01]);
                }
            }
            build_from_triangles(&vertices, &faces).unwrap()
        })
    })
}

/// An octahedron with randomly perturbed vertices.
fn arb_octahedron() -> impl Strategy<Value = Mesh> {
    prop::collection::vec(prop::array::uniform3(-0.2..0.2f64), 6).prop_map(|jitter| {
        let base = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        let vertices: Vec<Point3<f64>> = base
            .iter()
            .zip(&jitter)
            .map(|(b, j)| Point3::new(b[0] + j[0], b[1] + j[1], b[2] + j[2]))
            .collect();
        let faces = vec![
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ];
        build_from_triangles(&vertices, &faces).unwrap()
    })
}

fn directed_edges(mesh: &Mesh) -> BTreeSet<(usize, usize)> {
    mesh.halfedges()
        .map(|(_, he)| (he.start.index(), he.end.index()))
        .collect()
}

fn assert_opposite_symmetry(mesh: &Mesh) {
    for (id, he) in mesh.halfedges() {
        if let Some(o) = he.opposite {
            let opp = mesh.halfedge(o);
            assert_eq!(opp.opposite, Some(id));
            assert_eq!((opp.start, opp.end), (he.end, he.start));
        }
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Any sequence of triangle insertions, accepted or rejected, leaves a
    /// structurally valid mesh with three half-edges per triangle.
    #[test]
    fn proptest_insertions_keep_invariants((positions, faces) in arb_soup()) {
        let mut mesh: Mesh = Mesh::new();
        let ids: Vec<VertexId> = positions.iter().map(|&p| mesh.add_vertex(p)).collect();

        for [a, b, c] in faces {
            let before = (mesh.num_triangles(), mesh.num_halfedges());
            let edges_before = directed_edges(&mesh);

            if mesh.add_triangle(ids[a], ids[b], ids[c]).is_err() {
                prop_assert_eq!((mesh.num_triangles(), mesh.num_halfedges()), before);
                prop_assert_eq!(directed_edges(&mesh), edges_before);
            }

            prop_assert_eq!(mesh.num_halfedges(), 3 * mesh.num_triangles());
            prop_assert!(mesh.validate().is_ok());
        }
        assert_opposite_symmetry(&mesh);
    }

    /// Removing a triangle and adding it back restores the directed edge set.
    #[test]
    fn proptest_remove_then_readd(mesh in arb_height_field(), pick in any::<prop::sample::Index>()) {
        let mut mesh = mesh;
        let edges_before = directed_edges(&mesh);

        let ids: Vec<TriangleId> = mesh.triangle_ids().collect();
        let t = ids[pick.index(ids.len())];
        let [a, b, c] = mesh.triangle_vertices(t);

        mesh.remove_triangle(t).unwrap();
        prop_assert!(mesh.validate().is_ok());
        mesh.add_triangle(a, b, c).unwrap();

        prop_assert_eq!(directed_edges(&mesh), edges_before);
        prop_assert!(mesh.validate().is_ok());
        assert_opposite_symmetry(&mesh);
    }

    /// One subdivision pass quadruples the triangle count.
    #[test]
    fn proptest_subdivision_quadruples(mesh in arb_height_field()) {
        let mut mesh = mesh;
        let before = mesh.num_triangles();
        let vertices_before = mesh.num_vertices();
        let boundary_before = mesh.halfedges().filter(|(_, he)| he.is_boundary()).count();

        let report = mesh.subdivide().unwrap();

        prop_assert_eq!(mesh.num_triangles(), 4 * before);
        prop_assert_eq!(report.skipped_triangles, 0);
        // One new vertex per undirected edge
        let undirected = (3 * before + boundary_before) / 2;
        prop_assert_eq!(mesh.num_vertices() - vertices_before, undirected);
        prop_assert!(mesh.validate().is_ok());
    }

    /// Simplification never goes below its target and keeps the mesh valid.
    #[test]
    fn proptest_simplify_never_undershoots(mesh in arb_height_field(), ratio in 0.0..1.0f64) {
        let mut mesh = mesh;
        let outcome = simplify_to_ratio(&mut mesh, ratio);

        prop_assert!(outcome.achieved >= outcome.target);
        prop_assert_eq!(outcome.achieved, mesh.num_triangles());
        prop_assert_eq!(outcome.original_triangles - outcome.achieved, 2 * outcome.collapses);
        prop_assert!(mesh.validate().is_ok());
        assert_opposite_symmetry(&mesh);
    }

    /// A perturbed octahedron always simplifies to a tetrahedron.
    #[test]
    fn proptest_octahedron_to_four(mesh in arb_octahedron()) {
        let mut mesh = mesh;
        let outcome = mesh.simplify(4).unwrap();

        prop_assert!(outcome.reached);
        prop_assert_eq!(mesh.num_triangles(), 4);
        prop_assert!(mesh.halfedges().all(|(_, he)| !he.is_boundary()));
        prop_assert!(mesh.validate().is_ok());
    }
}

fn simplify_to_ratio(mesh: &mut Mesh, ratio: f64) -> SimplifyOutcome {
    loopmesh::algo::simplify::simplify(mesh, &SimplifyOptions::with_target_ratio(ratio)).unwrap()
}
