//! Loop subdivision on the half-edge mesh, performed in place.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::algo::Progress;
use crate::error::Result;
use crate::mesh::{HalfEdgeId, Mesh, MeshIndex, TriangleId, VertexId};

use super::{SubdivideOptions, SubdivisionReport};

/// Performs Loop subdivision on a triangle mesh.
///
/// Each pass quadruples the triangle count when every edge vertex resolves.
///
/// # Vertex Rules
///
/// - **Interior edge vertex**: `3/8 * (v0 + v1) + 1/8 * (apex + mirror apex)`
/// - **Boundary or creased edge vertex**: `1/2 * (v0 + v1)`
/// - **Interior vertex**: `(1 - n*β) * v + β * Σ(ring)`, see [`loop_beta`]
/// - **Creased vertex**: `3/4 * v + 1/8 * w + 1/8 * (apex across the crease)`
/// - **Boundary vertex**: `3/4 * v + 1/8 * (left + right)`
///
/// # Errors
///
/// Only structural invariant violations are reported. A triangle whose edge
/// vertices cannot all be found is skipped and counted in the report.
pub fn loop_subdivide<I: MeshIndex>(
    mesh: &mut Mesh<I>,
    options: &SubdivideOptions,
) -> Result<SubdivisionReport> {
    loop_subdivide_with_progress(mesh, options, &Progress::none())
}

/// Loop subdivision with progress reporting.
pub fn loop_subdivide_with_progress<I: MeshIndex>(
    mesh: &mut Mesh<I>,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<SubdivisionReport> {
    let mut report = SubdivisionReport {
        original_triangles: mesh.num_triangles(),
        triangles: mesh.num_triangles(),
        ..Default::default()
    };

    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Loop subdivision");
        let pass = subdivide_once(mesh, options.parallel)?;
        report.iterations += 1;
        report.new_vertices += pass.new_vertices;
        report.skipped_triangles += pass.skipped_triangles;
    }
    if options.iterations > 0 {
        progress.report(options.iterations, options.iterations, "Loop subdivision");
    }

    report.triangles = mesh.num_triangles();
    log::info!(
        "Loop subdivision: {} -> {} triangles in {} pass(es)",
        report.original_triangles,
        report.triangles,
        report.iterations
    );
    Ok(report)
}

impl<I: MeshIndex> Mesh<I> {
    /// Run one Loop subdivision pass.
    pub fn subdivide(&mut self) -> Result<SubdivisionReport> {
        loop_subdivide(self, &SubdivideOptions::new(1))
    }
}

#[derive(Debug, Default)]
struct PassStats {
    new_vertices: usize,
    skipped_triangles: usize,
}

/// A creased parent edge and the child vertex placed on it.
struct CreasedEdge<I: MeshIndex> {
    start: VertexId<I>,
    end: VertexId<I>,
    child: VertexId<I>,
    weight: f64,
}

/// Perform one pass of Loop subdivision.
fn subdivide_once<I: MeshIndex>(mesh: &mut Mesh<I>, parallel: bool) -> Result<PassStats> {
    mesh.clear_parents();
    if mesh.num_triangles() == 0 {
        return Ok(PassStats::default());
    }

    let smoothed = smoothed_positions(mesh, parallel);
    let (new_vertices, creased) = insert_edge_vertices(mesh)?;

    for (v, pos) in smoothed {
        mesh.set_position(v, pos);
    }

    let originals: Vec<TriangleId<I>> = mesh.triangle_ids().collect();
    let mut skipped_triangles = 0;
    for t in originals {
        if !split_triangle(mesh, t)? {
            skipped_triangles += 1;
        }
    }

    for edge in creased {
        mesh.set_crease_partial(edge.start, edge.child, edge.weight);
        mesh.set_crease_partial(edge.child, edge.end, edge.weight);
    }

    if skipped_triangles > 0 {
        log::warn!(
            "Loop subdivision skipped {} triangle(s) with missing edge vertices",
            skipped_triangles
        );
    }
    log::debug!(
        "Loop subdivision pass: {} new vertices, {} triangles",
        new_vertices,
        mesh.num_triangles()
    );

    Ok(PassStats {
        new_vertices,
        skipped_triangles,
    })
}

/// Compute the Loop smoothing weight for a vertex with `n` ring neighbours.
///
/// Valence 3 uses the fixed weight 3/16; every other valence uses 3/(8n).
pub fn loop_beta(n: usize) -> f64 {
    if n == 3 {
        3.0 / 16.0
    } else {
        3.0 / (8.0 * n as f64)
    }
}

/// Pick the half-edge that decides each vertex's rule.
///
/// The first creased outgoing half-edge wins; otherwise the first outgoing
/// half-edge in slot order. Isolated vertices get `None`.
fn rule_seeds<I: MeshIndex>(mesh: &Mesh<I>) -> Vec<Option<HalfEdgeId<I>>> {
    let mut seeds = mesh.first_outgoing();
    let mut has_crease = vec![false; seeds.len()];
    for (id, he) in mesh.halfedges() {
        let v = he.start.index();
        if he.is_creased() && !has_crease[v] {
            has_crease[v] = true;
            seeds[v] = Some(id);
        }
    }
    seeds
}

/// Buffered new positions for every non-isolated vertex.
fn smoothed_positions<I: MeshIndex>(
    mesh: &Mesh<I>,
    parallel: bool,
) -> Vec<(VertexId<I>, Point3<f64>)> {
    let seeds = rule_seeds(mesh);
    let compute = |i: usize| {
        seeds[i].map(|he| (VertexId::new(i), smoothed_position(mesh, he)))
    };

    if parallel {
        (0..seeds.len()).into_par_iter().filter_map(compute).collect()
    } else {
        (0..seeds.len()).filter_map(compute).collect()
    }
}

/// New position for `start(seed)`.
fn smoothed_position<I: MeshIndex>(mesh: &Mesh<I>, seed: HalfEdgeId<I>) -> Point3<f64> {
    let edge = mesh.halfedge(seed);
    let v = mesh.position(edge.start);

    if edge.is_creased() {
        return match edge.opposite {
            Some(o) => {
                let w = mesh.position(edge.end);
                let far = mesh.position(mesh.apex(o));
                Point3::from(v.coords * 0.75 + w.coords * 0.125 + far.coords * 0.125)
            }
            None => boundary_position(mesh, seed),
        };
    }

    let fan = mesh.outgoing_fan(seed);
    if !fan.closed {
        return boundary_position(mesh, seed);
    }

    let n = fan.len();
    if n < 3 {
        return *v;
    }

    let beta = loop_beta(n);
    let ring_sum: Vector3<f64> = fan
        .halfedges
        .iter()
        .map(|&he| mesh.position(mesh.end(he)).coords)
        .sum();

    Point3::from(v.coords * (1.0 - n as f64 * beta) + ring_sum * beta)
}

/// Boundary rule: `3/4 * v + 1/8 * (left + right)`.
///
/// Vertices that do not have exactly two distinct boundary neighbours stay put.
fn boundary_position<I: MeshIndex>(mesh: &Mesh<I>, seed: HalfEdgeId<I>) -> Point3<f64> {
    let v = *mesh.position(mesh.start(seed));
    match boundary_neighbours(mesh, seed) {
        Some((left, right)) if left != right => {
            let l = mesh.position(left);
            let r = mesh.position(right);
            Point3::from(v.coords * 0.75 + (l.coords + r.coords) * 0.125)
        }
        _ => v,
    }
}

/// The ends of the two boundary half-edges at `start(seed)`.
fn boundary_neighbours<I: MeshIndex>(
    mesh: &Mesh<I>,
    seed: HalfEdgeId<I>,
) -> Option<(VertexId<I>, VertexId<I>)> {
    let forward = mesh.outgoing_fan(seed);
    if forward.closed {
        return None;
    }
    let outgoing = *forward.halfedges.last()?;
    let left = mesh.end(outgoing);

    let mut he = seed;
    for _ in 0..mesh.num_halfedges() {
        let incoming = mesh.next(mesh.next(he));
        match mesh.opposite(incoming) {
            Some(o) => he = o,
            None => return Some((left, mesh.start(incoming))),
        }
    }
    None
}

/// Create one child vertex per undirected edge, using pre-pass positions.
fn insert_edge_vertices<I: MeshIndex>(
    mesh: &mut Mesh<I>,
) -> Result<(usize, Vec<CreasedEdge<I>>)> {
    let ids: Vec<HalfEdgeId<I>> = mesh.halfedge_ids().collect();
    let mut created = 0;
    let mut creased = Vec::new();

    for he in ids {
        let edge = *mesh.halfedge(he);
        if mesh.child_vertex(edge.start, edge.end).is_some() {
            continue;
        }

        let p1 = mesh.position(edge.start).coords;
        let p2 = mesh.position(edge.end).coords;
        let pos = match edge.opposite {
            Some(o) if !edge.is_creased() => {
                let p3 = mesh.position(mesh.apex(he)).coords;
                let p4 = mesh.position(mesh.apex(o)).coords;
                Point3::from((p1 + p2) * 0.375 + (p3 + p4) * 0.125)
            }
            _ => Point3::from((p1 + p2) * 0.5),
        };

        let child = mesh.add_vertex(pos);
        mesh.set_parents_child(edge.start, edge.end, child)?;
        created += 1;

        if edge.is_creased() {
            creased.push(CreasedEdge {
                start: edge.start,
                end: edge.end,
                child,
                weight: edge.crease,
            });
        }
    }

    Ok((created, creased))
}

/// Replace `t` with its 3 corner triangles and the center triangle.
///
/// Returns `false` (leaving `t` in place) if an edge vertex is missing.
fn split_triangle<I: MeshIndex>(mesh: &mut Mesh<I>, t: TriangleId<I>) -> Result<bool> {
    let [a, b, c] = mesh.triangle_vertices(t);
    let (Some(ab), Some(bc), Some(ca)) = (
        mesh.child_vertex(a, b),
        mesh.child_vertex(b, c),
        mesh.child_vertex(c, a),
    ) else {
        log::debug!("{:?} has an edge without a child vertex", t);
        return Ok(false);
    };

    mesh.remove_triangle(t)?;
    mesh.add_triangle(a, ab, ca)?;
    mesh.add_triangle(ab, b, bc)?;
    mesh.add_triangle(ca, bc, c)?;
    mesh.add_triangle(ab, bc, ca)?;
    Ok(true)
}
