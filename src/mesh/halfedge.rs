//! Half-edge mesh data structure.
//!
//! This module provides the directed half-edge representation used by the
//! kernel. The mesh owns three arenas (vertices, half-edges, triangles) and
//! every cross reference is an index into one of them.
//!
//! # Structure
//!
//! - A **half-edge** runs from `start` to `end`, belongs to exactly one
//!   triangle, links to the `next` half-edge around that triangle and, when
//!   the neighbouring triangle exists, to its `opposite`
//! - A **triangle** only stores one of its three half-edges; the other two are
//!   reached by following `next`
//! - A **vertex** is a position plus a stable index and knows nothing about
//!   adjacency
//!
//! The edge table maps every ordered `(start, end)` pair to its half-edge, so
//! at most one half-edge exists per ordered pair. Half-edges are created and
//! destroyed in triples together with their triangle.
//!
//! # Boundary Handling
//!
//! A half-edge without an opposite lies on the mesh boundary. Fan walks report
//! whether they closed or ran into such a half-edge.

use std::collections::{BTreeMap, HashMap};

use nalgebra::{Point3, Vector3};

use super::index::{HalfEdgeId, MeshIndex, TriangleId, VertexId};
use crate::error::{MeshError, Result};

/// A vertex in the mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// Stable index assigned at creation.
    pub index: VertexId<I>,

    /// The 3D position of this vertex.
    pub position: Point3<f64>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex at the given position.
    pub fn new(index: VertexId<I>, position: Point3<f64>) -> Self {
        Self { index, position }
    }
}

/// A directed half-edge owned by one triangle.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge leaves.
    pub start: VertexId<I>,

    /// The vertex this half-edge points to.
    pub end: VertexId<I>,

    /// The triangle owning this half-edge.
    pub triangle: TriangleId<I>,

    /// The next half-edge around the owning triangle.
    pub next: HalfEdgeId<I>,

    /// The half-edge running `end -> start`, if the neighbouring triangle exists.
    pub opposite: Option<HalfEdgeId<I>>,

    /// Crease weight. Zero means the edge is smooth.
    pub crease: f64,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.opposite.is_none()
    }

    /// Check if this half-edge carries a crease.
    #[inline]
    pub fn is_creased(&self) -> bool {
        self.crease > 0.0
    }
}

/// A triangle, referenced through one of its three half-edges.
#[derive(Debug, Clone, Copy)]
pub struct Triangle<I: MeshIndex = u32> {
    /// Monotonically assigned id.
    pub id: TriangleId<I>,

    /// Any one of the three half-edges of this triangle.
    pub edge: HalfEdgeId<I>,
}

/// The half-edges visited by a fan walk around a vertex.
#[derive(Debug, Clone)]
pub struct Fan<I: MeshIndex = u32> {
    /// Visited half-edges in walk order, starting with the seed.
    pub halfedges: Vec<HalfEdgeId<I>>,

    /// True if the walk returned to the seed; false if it hit a boundary.
    pub closed: bool,
}

impl<I: MeshIndex> Fan<I> {
    /// Number of half-edges in the fan.
    #[inline]
    pub fn len(&self) -> usize {
        self.halfedges.len()
    }

    /// True if the fan visited nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.halfedges.is_empty()
    }
}

type EdgeKey<I> = (VertexId<I>, VertexId<I>);

/// A half-edge triangle mesh.
///
/// Vertices are never removed. Half-edge slots are recycled through a free
/// list; triangle ids are never reused. Removed triangles leave nothing
/// behind in the triangle table.
#[derive(Debug, Clone)]
pub struct Mesh<I: MeshIndex = u32> {
    /// All vertices in the mesh.
    pub(crate) vertices: Vec<Vertex<I>>,

    /// Half-edge arena; `None` marks a free slot.
    pub(crate) halfedges: Vec<Option<HalfEdge<I>>>,

    /// Free half-edge slots.
    free_halfedges: Vec<HalfEdgeId<I>>,

    /// Live triangles keyed by id.
    triangles: BTreeMap<TriangleId<I>, Triangle<I>>,

    /// Id for the next triangle added.
    next_triangle: TriangleId<I>,

    /// Outgoing half-edge count per vertex.
    degree: Vec<usize>,

    /// Ordered pair lookup.
    edges: HashMap<EdgeKey<I>, HalfEdgeId<I>>,

    /// Unordered parent pair to midpoint child, valid for one subdivision pass.
    vertex_parents: HashMap<EdgeKey<I>, VertexId<I>>,
}

impl<I: MeshIndex> Default for Mesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn parent_key<I: MeshIndex>(a: VertexId<I>, b: VertexId<I>) -> EdgeKey<I> {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl<I: MeshIndex> Mesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            free_halfedges: Vec::new(),
            triangles: BTreeMap::new(),
            next_triangle: TriangleId::new(0),
            degree: Vec::new(),
            edges: HashMap::new(),
            vertex_parents: HashMap::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_triangles * 3),
            free_halfedges: Vec::new(),
            triangles: BTreeMap::new(),
            next_triangle: TriangleId::new(0),
            degree: Vec::with_capacity(num_vertices),
            edges: HashMap::with_capacity(num_triangles * 3),
            vertex_parents: HashMap::new(),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices (isolated ones included).
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of live half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len() - self.free_halfedges.len()
    }

    /// Get the number of live triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a live half-edge by ID, or `None` for a free slot.
    #[inline]
    pub fn try_halfedge(&self, id: HalfEdgeId<I>) -> Option<&HalfEdge<I>> {
        self.halfedges.get(id.index()).and_then(Option::as_ref)
    }

    /// Get a half-edge by ID.
    ///
    /// # Panics
    /// Panics if the half-edge has been removed.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        match self.try_halfedge(id) {
            Some(he) => he,
            None => panic!("{:?} is not a live half-edge", id),
        }
    }

    #[inline]
    fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        match self.halfedges.get_mut(id.index()).and_then(Option::as_mut) {
            Some(he) => he,
            None => panic!("{:?} is not a live half-edge", id),
        }
    }

    /// Get a live triangle by ID, or `None` if it was removed.
    #[inline]
    pub fn try_triangle(&self, id: TriangleId<I>) -> Option<&Triangle<I>> {
        self.triangles.get(&id)
    }

    /// Get a triangle by ID.
    ///
    /// # Panics
    /// Panics if the triangle has been removed.
    #[inline]
    pub fn triangle(&self, id: TriangleId<I>) -> &Triangle<I> {
        match self.try_triangle(id) {
            Some(t) => t,
            None => panic!("{:?} is not a live triangle", id),
        }
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertices[v.index()].position = pos;
    }

    /// True if no half-edge starts at `v`.
    #[inline]
    pub fn is_isolated(&self, v: VertexId<I>) -> bool {
        self.degree[v.index()] == 0
    }

    // ==================== Topology Queries ====================

    /// Look up the half-edge for the ordered pair `(a, b)`.
    #[inline]
    pub fn get_edge(&self, a: VertexId<I>, b: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.edges.get(&(a, b)).copied()
    }

    /// Get the next half-edge around the triangle.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the opposite half-edge, if any.
    #[inline]
    pub fn opposite(&self, he: HalfEdgeId<I>) -> Option<HalfEdgeId<I>> {
        self.halfedge(he).opposite
    }

    /// Get the start vertex of a half-edge.
    #[inline]
    pub fn start(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).start
    }

    /// Get the end vertex of a half-edge.
    #[inline]
    pub fn end(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).end
    }

    /// The vertex of the owning triangle that is not on this half-edge.
    #[inline]
    pub fn apex(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.end(self.next(he))
    }

    /// Get the three half-edges of a triangle, starting at its stored edge.
    pub fn triangle_halfedges(&self, t: TriangleId<I>) -> [HalfEdgeId<I>; 3] {
        let he0 = self.triangle(t).edge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [he0, he1, he2]
    }

    /// Get the three vertices of a triangle in winding order.
    pub fn triangle_vertices(&self, t: TriangleId<I>) -> [VertexId<I>; 3] {
        let [he0, he1, he2] = self.triangle_halfedges(t);
        [self.start(he0), self.start(he1), self.start(he2)]
    }

    /// Get the positions of the three vertices of a triangle.
    pub fn triangle_positions(&self, t: TriangleId<I>) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.triangle_vertices(t);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// Walk the outgoing half-edges of `start(seed)` via `opposite` then `next`.
    ///
    /// Each visited half-edge contributes one ring neighbour (its end vertex).
    pub fn outgoing_fan(&self, seed: HalfEdgeId<I>) -> Fan<I> {
        self.walk_fan(seed, |mesh, he| mesh.opposite(he).map(|o| mesh.next(o)))
    }

    /// Walk the incoming half-edges of `end(seed)` via `next` then `opposite`.
    ///
    /// Each visited half-edge contributes one ring neighbour (its start vertex).
    pub fn incoming_fan(&self, seed: HalfEdgeId<I>) -> Fan<I> {
        self.walk_fan(seed, |mesh, he| mesh.opposite(mesh.next(he)))
    }

    fn walk_fan<F>(&self, seed: HalfEdgeId<I>, step: F) -> Fan<I>
    where
        F: Fn(&Self, HalfEdgeId<I>) -> Option<HalfEdgeId<I>>,
    {
        let limit = self.num_halfedges();
        let mut halfedges = vec![seed];
        let mut current = seed;
        loop {
            match step(self, current) {
                Some(he) if he == seed => {
                    return Fan {
                        halfedges,
                        closed: true,
                    }
                }
                Some(he) if halfedges.len() < limit => {
                    halfedges.push(he);
                    current = he;
                }
                _ => {
                    return Fan {
                        halfedges,
                        closed: false,
                    }
                }
            }
        }
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<I>> + '_ {
        self.vertices.iter()
    }

    /// Iterate over live half-edge IDs in slot order.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedges().map(|(id, _)| id)
    }

    /// Iterate over live half-edges with their IDs in slot order.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .filter_map(|(i, he)| he.as_ref().map(|he| (HalfEdgeId::new(i), he)))
    }

    /// Iterate over live triangle IDs in creation order.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId<I>> + '_ {
        self.triangles.keys().copied()
    }

    /// Iterate over live triangles in creation order.
    pub fn triangles(&self) -> impl Iterator<Item = &Triangle<I>> + '_ {
        self.triangles.values()
    }

    /// For each vertex, its first outgoing half-edge in slot order.
    pub fn first_outgoing(&self) -> Vec<Option<HalfEdgeId<I>>> {
        let mut out = vec![None; self.vertices.len()];
        for (id, he) in self.halfedges() {
            let slot = &mut out[he.start.index()];
            if slot.is_none() {
                *slot = Some(id);
            }
        }
        out
    }

    // ==================== Geometry ====================

    /// Compute the unit normal of a triangle (zero for degenerate triangles).
    pub fn face_normal(&self, t: TriangleId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.triangle_positions(t);
        (p1 - p0)
            .cross(&(p2 - p1))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Compute the area of a triangle.
    pub fn triangle_area(&self, t: TriangleId<I>) -> f64 {
        let [p0, p1, p2] = self.triangle_positions(t);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Compute the length of a half-edge.
    pub fn edge_length(&self, he: HalfEdgeId<I>) -> f64 {
        let he = self.halfedge(he);
        (self.position(he.end) - self.position(he.start)).norm()
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;
        let mut min = first.position;
        let mut max = first.position;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.triangle_ids().map(|t| self.triangle_area(t)).sum()
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(id, position));
        self.degree.push(0);
        id
    }

    /// Add the triangle `a -> b -> c`.
    ///
    /// Creates the half-edges `a->b`, `b->c`, `c->a`, links them into a cycle,
    /// and pairs each with its reversed counterpart if that already exists.
    /// A half-edge that finds an opposite inherits the opposite's crease.
    ///
    /// # Errors
    ///
    /// Fails without touching the mesh if a vertex does not exist, a vertex is
    /// repeated, any of the three ordered pairs is already present, or the
    /// half-edge arena would outgrow the index type.
    pub fn add_triangle(
        &mut self,
        a: VertexId<I>,
        b: VertexId<I>,
        c: VertexId<I>,
    ) -> Result<TriangleId<I>> {
        for v in [a, b, c] {
            if v.index() >= self.vertices.len() {
                return Err(MeshError::InvalidVertex { vertex: v.index() });
            }
        }
        if a == b || b == c || c == a {
            return Err(MeshError::DegenerateTriangle {
                a: a.index(),
                b: b.index(),
                c: c.index(),
            });
        }
        let pairs = [(a, b), (b, c), (c, a)];
        for &(start, end) in &pairs {
            if self.edges.contains_key(&(start, end)) {
                return Err(MeshError::DuplicateEdge {
                    start: start.index(),
                    end: end.index(),
                });
            }
        }

        let fresh_slots = 3usize.saturating_sub(self.free_halfedges.len());
        let highest = self.halfedges.len() + fresh_slots;
        if fresh_slots > 0 && !I::fits(highest - 1) {
            return Err(MeshError::IndexOverflow {
                kind: "half-edge",
                limit: I::MAX.to_usize(),
            });
        }

        let id = self.next_triangle;
        self.next_triangle = id.successor();
        let slots = [
            self.alloc_halfedge(),
            self.alloc_halfedge(),
            self.alloc_halfedge(),
        ];

        for (k, &(start, end)) in pairs.iter().enumerate() {
            let opposite = self.get_edge(end, start);
            let crease = opposite.map_or(0.0, |o| self.halfedge(o).crease);
            self.halfedges[slots[k].index()] = Some(HalfEdge {
                start,
                end,
                triangle: id,
                next: slots[(k + 1) % 3],
                opposite,
                crease,
            });
            if let Some(o) = opposite {
                self.halfedge_mut(o).opposite = Some(slots[k]);
            }
            self.edges.insert((start, end), slots[k]);
            self.degree[start.index()] += 1;
        }

        self.triangles.insert(id, Triangle { id, edge: slots[0] });
        Ok(id)
    }

    fn alloc_halfedge(&mut self) -> HalfEdgeId<I> {
        match self.free_halfedges.pop() {
            Some(id) => id,
            None => {
                self.halfedges.push(None);
                HalfEdgeId::new(self.halfedges.len() - 1)
            }
        }
    }

    /// Remove a triangle and its three half-edges.
    ///
    /// Surviving opposites lose their back-link. Vertices are untouched.
    pub fn remove_triangle(&mut self, t: TriangleId<I>) -> Result<()> {
        if self.try_triangle(t).is_none() {
            return Err(MeshError::InvalidTriangle {
                triangle: t.index(),
            });
        }

        for he in self.triangle_halfedges(t) {
            let Some(removed) = self.halfedges[he.index()].take() else {
                continue;
            };
            self.edges.remove(&(removed.start, removed.end));
            if let Some(o) = removed.opposite {
                if let Some(opp) = self.halfedges[o.index()].as_mut() {
                    opp.opposite = None;
                }
            }
            self.degree[removed.start.index()] -= 1;
            self.free_halfedges.push(he);
        }

        self.triangles.remove(&t);
        Ok(())
    }

    /// Set the crease weight of the undirected edge `(a, b)`.
    ///
    /// Both directed half-edges must exist.
    pub fn set_crease(&mut self, a: VertexId<I>, b: VertexId<I>, weight: f64) -> Result<()> {
        if weight.is_nan() || weight < 0.0 {
            return Err(MeshError::invalid_param(
                "crease",
                weight,
                "must be non-negative",
            ));
        }
        let (Some(ab), Some(ba)) = (self.get_edge(a, b), self.get_edge(b, a)) else {
            return Err(MeshError::MissingEdge {
                a: a.index(),
                b: b.index(),
            });
        };
        self.halfedge_mut(ab).crease = weight;
        self.halfedge_mut(ba).crease = weight;
        Ok(())
    }

    /// Set the crease weight on whichever halves of `(a, b)` exist.
    pub(crate) fn set_crease_partial(&mut self, a: VertexId<I>, b: VertexId<I>, weight: f64) {
        for (s, e) in [(a, b), (b, a)] {
            if let Some(he) = self.get_edge(s, e) {
                self.halfedge_mut(he).crease = weight;
            }
        }
    }

    // ==================== Subdivision side table ====================

    /// The midpoint child registered for the unordered pair `(p1, p2)`.
    #[inline]
    pub fn child_vertex(&self, p1: VertexId<I>, p2: VertexId<I>) -> Option<VertexId<I>> {
        self.vertex_parents.get(&parent_key(p1, p2)).copied()
    }

    /// Register `child` as the midpoint of the unordered pair `(p1, p2)`.
    pub fn set_parents_child(
        &mut self,
        p1: VertexId<I>,
        p2: VertexId<I>,
        child: VertexId<I>,
    ) -> Result<()> {
        use std::collections::hash_map::Entry;

        match self.vertex_parents.entry(parent_key(p1, p2)) {
            Entry::Occupied(_) => Err(MeshError::DuplicateChild {
                a: p1.index(),
                b: p2.index(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(child);
                Ok(())
            }
        }
    }

    /// Forget all parent/child relationships.
    pub fn clear_parents(&mut self) {
        self.vertex_parents.clear();
    }

    // ==================== Validation ====================

    /// Check every structural invariant, reporting the first violation.
    pub fn validate(&self) -> Result<()> {
        let live_halfedges = self.halfedges.iter().filter(|he| he.is_some()).count();
        if live_halfedges != 3 * self.num_triangles() {
            return Err(MeshError::invalid_state(format!(
                "{} half-edges for {} triangles",
                live_halfedges,
                self.num_triangles()
            )));
        }
        if self.edges.len() != live_halfedges {
            return Err(MeshError::invalid_state(format!(
                "edge table has {} entries for {} half-edges",
                self.edges.len(),
                live_halfedges
            )));
        }

        for (id, he) in self.halfedges() {
            if self.get_edge(he.start, he.end) != Some(id) {
                return Err(MeshError::invalid_state(format!(
                    "{:?} is not registered under ({:?}, {:?})",
                    id, he.start, he.end
                )));
            }
            if self.try_triangle(he.triangle).is_none() {
                return Err(MeshError::invalid_state(format!(
                    "{:?} belongs to dead {:?}",
                    id, he.triangle
                )));
            }

            let mut current = id;
            for _ in 0..3 {
                let Some(cur) = self.try_halfedge(current) else {
                    return Err(MeshError::invalid_state(format!(
                        "next chain of {:?} reaches a dead half-edge",
                        id
                    )));
                };
                let Some(nxt) = self.try_halfedge(cur.next) else {
                    return Err(MeshError::invalid_state(format!(
                        "next chain of {:?} reaches a dead half-edge",
                        id
                    )));
                };
                if cur.triangle != he.triangle || cur.end != nxt.start {
                    return Err(MeshError::invalid_state(format!(
                        "next chain of {:?} is broken",
                        id
                    )));
                }
                current = cur.next;
            }
            if current != id {
                return Err(MeshError::invalid_state(format!(
                    "next chain of {:?} does not close after three steps",
                    id
                )));
            }

            match he.opposite {
                Some(o) => {
                    let Some(opp) = self.try_halfedge(o) else {
                        return Err(MeshError::invalid_state(format!(
                            "{:?} has a dead opposite",
                            id
                        )));
                    };
                    if opp.opposite != Some(id) || opp.start != he.end || opp.end != he.start {
                        return Err(MeshError::invalid_state(format!(
                            "{:?} and {:?} are not mutual opposites",
                            id, o
                        )));
                    }
                }
                None => {
                    if self.get_edge(he.end, he.start).is_some() {
                        return Err(MeshError::invalid_state(format!(
                            "{:?} is missing the link to its existing opposite",
                            id
                        )));
                    }
                }
            }
        }

        for (&id, t) in &self.triangles {
            match self.try_halfedge(t.edge) {
                Some(he) if he.triangle == id && t.id == id => {}
                _ => {
                    return Err(MeshError::invalid_state(format!(
                        "{:?} references a half-edge it does not own",
                        t.id
                    )))
                }
            }
        }

        Ok(())
    }

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// The set of ordered pairs currently in the edge table.
    #[cfg(test)]
    pub(crate) fn edge_keys(&self) -> std::collections::BTreeSet<(usize, usize)> {
        self.edges
            .keys()
            .map(|(a, b)| (a.index(), b.index()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> (Mesh, [VertexId; 3]) {
        let mut mesh = Mesh::new();
        let v0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let v2 = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        (mesh, [v0, v1, v2])
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_triangles(), 0);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_add_vertex() {
        let (mesh, [v0, v1, v2]) = triangle_mesh();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(v0.index(), 0);
        assert_eq!(v1.index(), 1);
        assert_eq!(mesh.vertex(v2).index, v2);
        assert!(mesh.is_isolated(v0));
    }

    #[test]
    fn test_add_triangle_links_cycle() {
        let (mut mesh, [v0, v1, v2]) = triangle_mesh();
        let t = mesh.add_triangle(v0, v1, v2).unwrap();

        assert_eq!(mesh.num_triangles(), 1);
        assert_eq!(mesh.num_halfedges(), 3);
        assert_eq!(mesh.triangle_vertices(t), [v0, v1, v2]);

        let he = mesh.get_edge(v0, v1).unwrap();
        assert_eq!(mesh.next(mesh.next(mesh.next(he))), he);
        assert_eq!(mesh.apex(he), v2);
        assert!(mesh.halfedge(he).is_boundary());
        assert!(mesh.get_edge(v1, v0).is_none());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_opposites_are_linked() {
        let (mut mesh, [v0, v1, v2]) = triangle_mesh();
        let v3 = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        mesh.add_triangle(v0, v1, v2).unwrap();
        mesh.add_triangle(v2, v1, v3).unwrap();

        let a = mesh.get_edge(v1, v2).unwrap();
        let b = mesh.get_edge(v2, v1).unwrap();
        assert_eq!(mesh.opposite(a), Some(b));
        assert_eq!(mesh.opposite(b), Some(a));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_duplicate_edge_leaves_mesh_unchanged() {
        let (mut mesh, [v0, v1, v2]) = triangle_mesh();
        let v3 = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        mesh.add_triangle(v0, v1, v2).unwrap();
        let before = mesh.edge_keys();

        // (v0, v1) is already owned by the first triangle
        let err = mesh.add_triangle(v0, v1, v3).unwrap_err();
        assert!(matches!(err, MeshError::DuplicateEdge { start: 0, end: 1 }));
        assert_eq!(mesh.num_triangles(), 1);
        assert_eq!(mesh.num_halfedges(), 3);
        assert_eq!(mesh.edge_keys(), before);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_degenerate_and_unknown_vertices_rejected() {
        let (mut mesh, [v0, v1, _]) = triangle_mesh();
        assert!(matches!(
            mesh.add_triangle(v0, v1, v0),
            Err(MeshError::DegenerateTriangle { .. })
        ));
        assert!(matches!(
            mesh.add_triangle(v0, v1, VertexId::new(99)),
            Err(MeshError::InvalidVertex { vertex: 99 })
        ));
        assert_eq!(mesh.num_halfedges(), 0);
    }

    #[test]
    fn test_remove_triangle_clears_back_links() {
        let (mut mesh, [v0, v1, v2]) = triangle_mesh();
        let v3 = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        let t0 = mesh.add_triangle(v0, v1, v2).unwrap();
        mesh.add_triangle(v2, v1, v3).unwrap();

        mesh.remove_triangle(t0).unwrap();

        assert_eq!(mesh.num_triangles(), 1);
        assert_eq!(mesh.num_halfedges(), 3);
        assert!(mesh.get_edge(v1, v2).is_none());
        let survivor = mesh.get_edge(v2, v1).unwrap();
        assert_eq!(mesh.opposite(survivor), None);
        assert!(mesh.is_isolated(v0));
        assert!(mesh.try_triangle(t0).is_none());
        assert!(mesh.is_valid());

        assert!(matches!(
            mesh.remove_triangle(t0),
            Err(MeshError::InvalidTriangle { .. })
        ));
    }

    #[test]
    fn test_remove_then_readd_round_trip() {
        let (mut mesh, [v0, v1, v2]) = triangle_mesh();
        let v3 = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        mesh.add_triangle(v0, v1, v2).unwrap();
        let t = mesh.add_triangle(v2, v1, v3).unwrap();
        let after_add = mesh.edge_keys();

        mesh.remove_triangle(t).unwrap();
        let t2 = mesh.add_triangle(v2, v1, v3).unwrap();

        assert_ne!(t, t2, "triangle ids are never reused");
        assert_eq!(mesh.edge_keys(), after_add);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_set_crease_requires_both_halves() {
        let (mut mesh, [v0, v1, v2]) = triangle_mesh();
        let v3 = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        mesh.add_triangle(v0, v1, v2).unwrap();
        mesh.add_triangle(v2, v1, v3).unwrap();

        assert!(matches!(
            mesh.set_crease(v0, v1, 1.0),
            Err(MeshError::MissingEdge { .. })
        ));
        assert!(mesh.set_crease(v1, v2, -1.0).is_err());

        mesh.set_crease(v1, v2, 2.5).unwrap();
        let a = mesh.get_edge(v1, v2).unwrap();
        let b = mesh.get_edge(v2, v1).unwrap();
        assert_eq!(mesh.halfedge(a).crease, 2.5);
        assert!(mesh.halfedge(b).is_creased());
    }

    #[test]
    fn test_crease_inherited_on_readd() {
        let (mut mesh, [v0, v1, v2]) = triangle_mesh();
        let v3 = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        mesh.add_triangle(v0, v1, v2).unwrap();
        let t = mesh.add_triangle(v2, v1, v3).unwrap();
        mesh.set_crease(v1, v2, 1.0).unwrap();

        mesh.remove_triangle(t).unwrap();
        mesh.add_triangle(v2, v1, v3).unwrap();

        let he = mesh.get_edge(v2, v1).unwrap();
        assert_eq!(mesh.halfedge(he).crease, 1.0);
    }

    #[test]
    fn test_parent_child_table() {
        let (mut mesh, [v0, v1, v2]) = triangle_mesh();
        let child = mesh.add_vertex(Point3::new(0.5, 0.0, 0.0));

        assert_eq!(mesh.child_vertex(v0, v1), None);
        mesh.set_parents_child(v0, v1, child).unwrap();
        assert_eq!(mesh.child_vertex(v1, v0), Some(child));
        assert!(matches!(
            mesh.set_parents_child(v1, v0, v2),
            Err(MeshError::DuplicateChild { .. })
        ));

        mesh.clear_parents();
        assert_eq!(mesh.child_vertex(v0, v1), None);
    }

    #[test]
    fn test_fans_on_open_triangle() {
        let (mut mesh, [v0, v1, v2]) = triangle_mesh();
        mesh.add_triangle(v0, v1, v2).unwrap();
        let he = mesh.get_edge(v0, v1).unwrap();

        let out = mesh.outgoing_fan(he);
        assert!(!out.closed);
        assert_eq!(out.len(), 1);

        let inc = mesh.incoming_fan(he);
        assert!(!inc.closed);
    }

    #[test]
    fn test_halfedge_slots_are_recycled() {
        let (mut mesh, [v0, v1, v2]) = triangle_mesh();
        let t = mesh.add_triangle(v0, v1, v2).unwrap();
        let slots = mesh.halfedges.len();

        mesh.remove_triangle(t).unwrap();
        mesh.add_triangle(v0, v2, v1).unwrap();

        assert_eq!(mesh.halfedges.len(), slots);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_long_edit_history_on_small_indices() {
        let mut mesh: Mesh<u16> = Mesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        let d = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        let kept = mesh.add_triangle(a, b, c).unwrap();

        let mut last = kept;
        for _ in 0..70_000 {
            last = mesh.add_triangle(c, b, d).unwrap();
            mesh.remove_triangle(last).unwrap();
        }

        assert_eq!(last.index(), 70_000);
        assert_eq!(mesh.num_triangles(), 1);
        assert_eq!(mesh.triangle_vertices(kept), [a, b, c]);
        assert_eq!(mesh.triangles.len(), 1);

        let fresh = mesh.add_triangle(c, b, d).unwrap();
        assert_ne!(fresh, kept);
        assert_eq!(mesh.num_triangles(), 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_halfedge_arena_overflow_is_an_error() {
        let mut mesh: Mesh<u16> = Mesh::new();
        let n = 150;
        for j in 0..n {
            for i in 0..n {
                mesh.add_vertex(Point3::new(i as f64, j as f64, 0.0));
            }
        }

        let mut added = 0;
        let mut failure = None;
        'grid: for j in 0..n - 1 {
            for i in 0..n - 1 {
                let v00 = VertexId::new(j * n + i);
                let v10 = VertexId::new(j * n + i + 1);
                let v01 = VertexId::new((j + 1) * n + i);
                let v11 = VertexId::new((j + 1) * n + i + 1);
                for [x, y, z] in [[v00, v10, v11], [v00, v11, v01]] {
                    match mesh.add_triangle(x, y, z) {
                        Ok(_) => added += 1,
                        Err(e) => {
                            failure = Some(e);
                            break 'grid;
                        }
                    }
                }
            }
        }

        // 65,536 slots hold 21,845 triangles
        assert_eq!(added, 21_845);
        assert!(matches!(
            failure,
            Some(MeshError::IndexOverflow { limit: 65_535, .. })
        ));
        assert_eq!(mesh.num_halfedges(), 3 * added);
        assert!(mesh.is_valid());
    }
}
