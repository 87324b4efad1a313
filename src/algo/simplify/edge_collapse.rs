//! Shortest-edge collapse on the half-edge mesh.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use nalgebra::Point3;

use crate::algo::Progress;
use crate::error::Result;
use crate::mesh::{HalfEdgeId, Mesh, MeshIndex, TriangleId, VertexId};

use super::{SimplifyOptions, SimplifyOutcome};

/// A half-edge keyed by its length. Ties are broken by id.
#[derive(Debug, Clone, Copy)]
struct Candidate<I: MeshIndex> {
    length: f64,
    id: HalfEdgeId<I>,
}

impl<I: MeshIndex> PartialEq for Candidate<I> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<I: MeshIndex> Eq for Candidate<I> {}

impl<I: MeshIndex> PartialOrd for Candidate<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I: MeshIndex> Ord for Candidate<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.length
            .total_cmp(&other.length)
            .then(self.id.cmp(&other.id))
    }
}

/// Ordered candidate set with a side map for O(log n) removal by id.
#[derive(Debug)]
struct CandidateQueue<I: MeshIndex> {
    order: BTreeSet<Candidate<I>>,
    lengths: HashMap<HalfEdgeId<I>, f64>,
}

impl<I: MeshIndex> CandidateQueue<I> {
    fn from_mesh(mesh: &Mesh<I>) -> Self {
        let mut queue = Self {
            order: BTreeSet::new(),
            lengths: HashMap::with_capacity(mesh.num_halfedges()),
        };
        for id in mesh.halfedge_ids() {
            queue.insert(id, mesh.edge_length(id));
        }
        queue
    }

    fn insert(&mut self, id: HalfEdgeId<I>, length: f64) {
        self.remove(id);
        self.lengths.insert(id, length);
        self.order.insert(Candidate { length, id });
    }

    fn remove(&mut self, id: HalfEdgeId<I>) {
        if let Some(length) = self.lengths.remove(&id) {
            self.order.remove(&Candidate { length, id });
        }
    }

    fn len(&self) -> usize {
        self.lengths.len()
    }

    fn shortest_first(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.order.iter().map(|c| c.id)
    }
}

/// A validated collapse of `v -> w`.
///
/// `ring` lists the neighbours of `w` in fan order, starting at `v`. A
/// boundary `v` is `pinned` and keeps its position.
struct CollapsePlan<I: MeshIndex> {
    v: VertexId<I>,
    w: VertexId<I>,
    ring: Vec<VertexId<I>>,
    doomed: Vec<TriangleId<I>>,
    pinned: bool,
}

/// Simplify a mesh by collapsing its shortest edges until the target triangle
/// count is reached or no edge can be collapsed.
///
/// The count never drops below the target: a collapse that would overshoot
/// is not performed.
///
/// # Errors
///
/// Returns an error for an invalid target ratio, or if the mesh turns out to
/// violate its structural invariants mid-collapse.
pub fn simplify<I: MeshIndex>(
    mesh: &mut Mesh<I>,
    options: &SimplifyOptions,
) -> Result<SimplifyOutcome> {
    simplify_with_progress(mesh, options, &Progress::none())
}

/// Simplification with progress reporting.
pub fn simplify_with_progress<I: MeshIndex>(
    mesh: &mut Mesh<I>,
    options: &SimplifyOptions,
    progress: &Progress,
) -> Result<SimplifyOutcome> {
    let original = mesh.num_triangles();
    let target = options.compute_target(original)?;
    let budget = original.saturating_sub(target);

    let mut queue = CandidateQueue::from_mesh(mesh);
    let mut collapses = 0;

    while mesh.num_triangles() > target {
        progress.report(original - mesh.num_triangles(), budget, "Collapsing edges");

        // Every collapse removes exactly two triangles
        if mesh.num_triangles() < target + 2 {
            break;
        }
        let Some(plan) = queue.shortest_first().find_map(|he| plan_collapse(&*mesh, he)) else {
            break;
        };

        apply_collapse(mesh, &mut queue, plan)?;
        collapses += 1;
    }

    let achieved = mesh.num_triangles();
    let reached = achieved <= target;
    if budget > 0 {
        progress.report(original - achieved, budget, "Collapsing edges");
    }

    if reached {
        log::info!(
            "Simplified {} -> {} triangles in {} collapse(s)",
            original,
            achieved,
            collapses
        );
    } else {
        log::warn!(
            "Simplification stopped at {} triangles, target was {} ({} collapse(s))",
            achieved,
            target,
            collapses
        );
    }

    Ok(SimplifyOutcome {
        original_triangles: original,
        target,
        achieved,
        collapses,
        reached,
    })
}

impl<I: MeshIndex> Mesh<I> {
    /// Collapse shortest edges until at most `target` triangles remain.
    pub fn simplify(&mut self, target: usize) -> Result<SimplifyOutcome> {
        simplify(self, &SimplifyOptions::with_target_triangles(target))
    }
}

/// Check whether `he` can be collapsed, returning the plan if so.
fn plan_collapse<I: MeshIndex>(mesh: &Mesh<I>, he: HalfEdgeId<I>) -> Option<CollapsePlan<I>> {
    let edge = mesh.try_halfedge(he)?;
    if edge.is_boundary() {
        return None;
    }
    let (v, w) = (edge.start, edge.end);

    // w must be interior; a boundary v absorbs it without moving
    let around_w = mesh.incoming_fan(he);
    if !around_w.closed {
        return None;
    }
    let (ring_v, v_closed) = one_ring(mesh, he);

    let ring: Vec<VertexId<I>> = around_w.halfedges.iter().map(|&h| mesh.start(h)).collect();
    let n = ring.len();
    if n < 3 {
        return None;
    }
    let ring_w: HashSet<VertexId<I>> = ring.iter().copied().collect();
    if ring_w.len() != n {
        log::debug!("{:?} has a repeated ring vertex, skipping", w);
        return None;
    }

    // Link condition: the two apexes of the edge are the only shared neighbours
    let common: HashSet<VertexId<I>> = ring_w
        .iter()
        .copied()
        .filter(|&r| r != v && r != w && ring_v.contains(&r))
        .collect();
    let (first, last) = (ring[1], ring[n - 1]);
    if common.len() != 2 || !common.contains(&first) || !common.contains(&last) {
        return None;
    }

    // New spokes must be new edges even where v's fan is not a single disk
    for &r in &ring[2..n - 1] {
        if mesh.get_edge(v, r).is_some() || mesh.get_edge(r, v).is_some() {
            return None;
        }
    }

    // A new fan triangle must not duplicate a face already on the other side
    for k in 1..n - 1 {
        if let Some(outer) = mesh.get_edge(ring[k], ring[k + 1]) {
            if mesh.apex(outer) == v {
                return None;
            }
        }
    }

    let doomed = around_w
        .halfedges
        .iter()
        .map(|&h| mesh.halfedge(h).triangle)
        .collect();

    Some(CollapsePlan {
        v,
        w,
        ring,
        doomed,
        pinned: !v_closed,
    })
}

/// Every neighbour of `start(out)`, and whether its fan is closed.
fn one_ring<I: MeshIndex>(mesh: &Mesh<I>, out: HalfEdgeId<I>) -> (HashSet<VertexId<I>>, bool) {
    let forward = mesh.outgoing_fan(out);
    let mut ring: HashSet<VertexId<I>> = forward.halfedges.iter().map(|&h| mesh.end(h)).collect();
    if forward.closed {
        return (ring, true);
    }

    // Walk back from `out` until the incoming boundary half-edge
    let mut current = out;
    for _ in 0..mesh.num_halfedges() {
        let incoming = mesh.next(mesh.next(current));
        ring.insert(mesh.start(incoming));
        match mesh.opposite(incoming) {
            Some(o) => current = o,
            None => break,
        }
    }
    (ring, false)
}

/// Perform a planned collapse and refresh the affected candidates.
fn apply_collapse<I: MeshIndex>(
    mesh: &mut Mesh<I>,
    queue: &mut CandidateQueue<I>,
    plan: CollapsePlan<I>,
) -> Result<()> {
    let CollapsePlan {
        v,
        w,
        ring,
        doomed,
        pinned,
    } = plan;

    if !pinned {
        let midpoint = Point3::from((mesh.position(v).coords + mesh.position(w).coords) * 0.5);
        mesh.set_position(v, midpoint);
    }

    for &t in &doomed {
        for h in mesh.triangle_halfedges(t) {
            queue.remove(h);
        }
        mesh.remove_triangle(t)?;
    }

    let mut created = Vec::with_capacity(ring.len() - 2);
    for k in 1..ring.len() - 1 {
        created.push(mesh.add_triangle(v, ring[k + 1], ring[k])?);
    }

    // New half-edges, plus every half-edge touching v since v moved
    let mut touched: Vec<HalfEdgeId<I>> = created
        .iter()
        .flat_map(|&t| mesh.triangle_halfedges(t))
        .collect();
    let fan = mesh.outgoing_fan(mesh.triangle_halfedges(created[0])[0]);
    for &out in &fan.halfedges {
        touched.push(out);
        touched.push(mesh.next(mesh.next(out)));
    }
    for h in touched {
        queue.insert(h, mesh.edge_length(h));
    }

    log::trace!("Collapsed {:?} into {:?}", w, v);
    Ok(())
}
