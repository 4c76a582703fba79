//! The incremental Delaunay triangulation.
//!
//! [`DelaunayTriangulation`] owns two arenas (triangles and points), a
//! deduplicating index over the planar coordinates, and an explicit
//! construction state. Points are inserted one at a time; each insertion
//! locates the affected region, splits or extends the mesh there, and restores
//! the Delaunay property with local edge flips. Expected insertion cost is
//! O(sqrt n) per point for well-distributed input, dominated by the locate
//! walk.
//!
//! The mesh is bounded by a ring of halfplane nodes, one per convex hull edge,
//! so every neighbor slot of every node is always linked and the walkers never
//! have to reason about a missing neighbor at the boundary.

use std::collections::BTreeMap;
use std::collections::VecDeque;

use ordered_float::OrderedFloat;

use crate::core::algorithms::{flips, insertion, locate, neighborhood};
use crate::core::collections::{fast_hash_set_with_capacity, FastHashSet, StorageMap};
use crate::core::errors::{QueryError, TopologyError};
use crate::core::triangle::{TriangleKey, TriangleNode, VertexKey};
use crate::geometry::algorithms::voronoi::{self, VoronoiCell, VoronoiError};
use crate::geometry::bounding_box::BoundingBox;
use crate::geometry::point::Point;
use crate::geometry::predicates::Circumcircle;

/// Lifecycle of the mesh while the first points arrive.
///
/// A triangulation needs three non-collinear points before it has any filled
/// triangle. Until then the inserted points are held in one of the bootstrap
/// states below; the first off-line point promotes the mesh to `Meshed` and
/// it never leaves that state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstructionState {
    /// No points inserted yet.
    Empty,
    /// Exactly one point inserted.
    Buffered {
        /// The lone point.
        first: VertexKey,
    },
    /// Two or more collinear points, held as a chain of halfplane pairs.
    Collinear {
        /// Smallest chain endpoint in the planar order.
        first_point: VertexKey,
        /// Largest chain endpoint in the planar order.
        last_point: VertexKey,
        /// Halfplane whose `b` corner is `first_point`.
        first_node: TriangleKey,
        /// Halfplane whose `a` corner is `last_point`.
        last_node: TriangleKey,
    },
    /// At least one filled triangle exists.
    Meshed,
}

/// An incremental planar Delaunay triangulation with carried heights.
///
/// # Examples
///
/// ```
/// use tinmesh::prelude::*;
///
/// let mut tin = DelaunayTriangulation::new();
/// tin.insert(point!(0.0, 0.0, 1.0))?;
/// tin.insert(point!(4.0, 0.0, 1.0))?;
/// tin.insert(point!(2.0, 3.0, 4.0))?;
/// assert_eq!(tin.number_of_triangles(), 1);
/// assert!(tin.contains(&point!(2.0, 1.0)));
/// # Ok::<(), tinmesh::core::errors::TopologyError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DelaunayTriangulation {
    /// Mesh nodes, filled triangles and hull halfplanes alike.
    pub(crate) triangles: StorageMap<TriangleKey, TriangleNode>,
    /// Inserted points.
    pub(crate) points: StorageMap<VertexKey, Point>,
    /// Planar-coordinate index for deduplication and ordered scans.
    pub(crate) vertex_index: BTreeMap<(OrderedFloat<f64>, OrderedFloat<f64>), VertexKey>,
    /// Bootstrap lifecycle state.
    pub(crate) state: ConstructionState,
    /// Filled triangle the locate walk starts from (last insertion site).
    pub(crate) start_triangle: Option<TriangleKey>,
    /// Any halfplane on the current hull ring.
    pub(crate) hull_start: Option<TriangleKey>,
    /// Bounds of the inserted point set.
    pub(crate) bounding_box: Option<BoundingBox>,
    /// Monotone counter, bumped once per accepted insertion.
    pub(crate) update_counter: u64,
    /// Value of `update_counter` at the last full enumeration.
    pub(crate) built_counter: u64,
}

impl Default for DelaunayTriangulation {
    fn default() -> Self {
        Self::new()
    }
}

impl DelaunayTriangulation {
    /// Creates an empty triangulation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            triangles: StorageMap::with_key(),
            points: StorageMap::with_key(),
            vertex_index: BTreeMap::new(),
            state: ConstructionState::Empty,
            start_triangle: None,
            hull_start: None,
            bounding_box: None,
            update_counter: 0,
            built_counter: 0,
        }
    }

    /// Inserts a point, restoring the Delaunay property locally.
    ///
    /// A point that coincides with an existing vertex in `(x, y)` is ignored
    /// without any side effect, so repeated insertion is idempotent.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if the mesh is found corrupted while the
    /// insertion site is rewired.
    pub fn insert(&mut self, p: Point) -> Result<(), TopologyError> {
        if self.vertex_index.contains_key(&p.ordered_xy()) {
            return Ok(());
        }
        self.update_counter += 1;
        let generation = self.update_counter;
        if let Some(bb) = &mut self.bounding_box {
            bb.expand(&p);
        } else {
            self.bounding_box = Some(BoundingBox::of_point(p));
        }
        let vk = self.points.insert(p);
        self.vertex_index.insert(p.ordered_xy(), vk);
        if let Some(seed) = insertion::insert_vertex(self, vk)? {
            flips::restore_delaunay(self, seed, generation)?;
            self.start_triangle = Some(seed);
        }
        Ok(())
    }

    /// Rebuilds the mesh from scratch over `points` and enumerates it.
    ///
    /// Any previous content is discarded. The returned keys cover every
    /// filled triangle, discovered breadth-first from the last insertion
    /// site; the list is empty when the input never leaves the bootstrap
    /// states (fewer than three distinct points, or all collinear).
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if an insertion corrupts the mesh.
    pub fn triangulate(&mut self, points: &[Point]) -> Result<Vec<TriangleKey>, TopologyError> {
        *self = Self::new();
        for p in points {
            self.insert(*p)?;
        }
        if self.update_counter != self.built_counter && self.points.len() > 2 {
            self.built_counter = self.update_counter;
            self.triangles()
        } else {
            Ok(Vec::new())
        }
    }

    /// Enumerates every filled triangle, breadth-first from the start node.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] on a dangling neighbor link.
    pub fn triangles(&self) -> Result<Vec<TriangleKey>, TopologyError> {
        if self.state != ConstructionState::Meshed {
            return Ok(Vec::new());
        }
        let mut start = self.locate_start().ok_or(TopologyError::NoStartTriangle)?;
        // A hull fallback seeds the walk from the filled triangle inside it.
        if self.node(start)?.is_halfplane() {
            start = locate::step_inward(self, start)?.ok_or(TopologyError::NoStartTriangle)?;
        }
        let mut found = Vec::with_capacity(self.triangles.len());
        let mut visited = fast_hash_set_with_capacity(self.triangles.len());
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);
        while let Some(key) = queue.pop_front() {
            let node = self.node(key)?;
            if node.is_halfplane() {
                continue;
            }
            found.push(key);
            for neighbor in node.neighbors().into_iter().flatten() {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        Ok(found)
    }

    /// Finds the mesh node containing `p` in the plane.
    ///
    /// The walk starts at the most recent insertion site. A point outside
    /// the convex hull yields the halfplane whose hull edge faces it.
    ///
    /// # Errors
    ///
    /// [`QueryError::EmptyTriangulation`] before the mesh has any filled
    /// triangle, or a wrapped [`TopologyError`] on corruption.
    pub fn locate(&self, p: &Point) -> Result<TriangleKey, QueryError> {
        if self.state != ConstructionState::Meshed {
            return Err(QueryError::EmptyTriangulation);
        }
        let start = self
            .locate_start()
            .ok_or(TopologyError::NoStartTriangle)?;
        Ok(locate::walk_from(self, start, p)?)
    }

    /// Like [`locate`](Self::locate), walking from a caller-chosen node.
    ///
    /// Useful for spatially coherent query batches: starting from the result
    /// of the previous query keeps each walk short.
    ///
    /// # Errors
    ///
    /// [`TopologyError::MissingTriangle`] (wrapped) when `start` is stale.
    pub fn locate_from(&self, start: TriangleKey, p: &Point) -> Result<TriangleKey, QueryError> {
        if self.state != ConstructionState::Meshed {
            return Err(QueryError::EmptyTriangulation);
        }
        if !self.triangles.contains_key(start) {
            return Err(TopologyError::MissingTriangle(start).into());
        }
        Ok(locate::walk_from(self, start, p)?)
    }

    /// Returns `true` if `p` lies inside or on the convex hull.
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        match self.locate(p) {
            Ok(key) => self
                .triangles
                .get(key)
                .is_some_and(|node| !node.is_halfplane()),
            Err(_) => false,
        }
    }

    /// Interpolates the surface height at `p`.
    ///
    /// When `p` coincides with a mesh vertex in `(x, y)` that vertex's `z` is
    /// returned directly; otherwise the height comes from the plane through
    /// the three corners of the containing triangle.
    ///
    /// # Errors
    ///
    /// [`QueryError::OutsideHull`] when `p` falls outside the hull,
    /// [`QueryError::DegenerateTriangle`] when the containing triangle has no
    /// planar extent, [`QueryError::EmptyTriangulation`] before the mesh is
    /// built.
    pub fn height_at(&self, p: &Point) -> Result<f64, QueryError> {
        let key = self.locate(p)?;
        let node = self.node(key)?;
        let Some(ck) = node.c else {
            return Err(QueryError::OutsideHull);
        };
        let a = self.point(node.a)?;
        let b = self.point(node.b)?;
        let c = self.point(ck)?;
        for corner in [&a, &b, &c] {
            if corner.same_xy(p) {
                return Ok(corner.z);
            }
        }
        // Plane through the three corners via its normal vector.
        let nx = (b.y - a.y) * (c.z - a.z) - (b.z - a.z) * (c.y - a.y);
        let ny = (b.z - a.z) * (c.x - a.x) - (b.x - a.x) * (c.z - a.z);
        let nz = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        if nz == 0.0 {
            return Err(QueryError::DegenerateTriangle);
        }
        Ok(a.z - (nx * (p.x - a.x) + ny * (p.y - a.y)) / nz)
    }

    /// Returns the inserted point closest to `p` among the corners near it.
    ///
    /// On a meshed triangulation this is the nearest corner of the node
    /// containing `p`, refined over that corner's one-ring when it is
    /// available. During bootstrap the (tiny) point set is scanned directly.
    ///
    /// # Errors
    ///
    /// [`QueryError::EmptyTriangulation`] when no point has been inserted.
    pub fn nearest_existing_point(&self, p: &Point) -> Result<Point, QueryError> {
        if self.points.is_empty() {
            return Err(QueryError::EmptyTriangulation);
        }
        if self.state != ConstructionState::Meshed {
            let nearest = self
                .points
                .values()
                .min_by(|l, r| {
                    OrderedFloat(l.distance_xy_squared(p))
                        .cmp(&OrderedFloat(r.distance_xy_squared(p)))
                })
                .copied()
                .ok_or(QueryError::EmptyTriangulation)?;
            return Ok(nearest);
        }
        let key = self.locate(p)?;
        let node = self.node(key)?;
        let mut best_key = node.a;
        let mut best = self.point(node.a)?;
        let mut corners = vec![node.b];
        corners.extend(node.c);
        for vk in corners {
            let q = self.point(vk)?;
            if q.distance_xy_squared(p) < best.distance_xy_squared(p) {
                best_key = vk;
                best = q;
            }
        }
        if !node.is_halfplane() {
            if let Some(ring) = neighborhood::vertex_neighbors(self, key, best_key)? {
                for vk in ring {
                    let q = self.point(vk)?;
                    if q.distance_xy_squared(p) < best.distance_xy_squared(p) {
                        best = q;
                    }
                }
            }
        }
        Ok(best)
    }

    /// The Voronoi cell dual to `vertex`, seen from the node `triangle`.
    ///
    /// # Errors
    ///
    /// See [`VoronoiError`].
    pub fn voronoi_cell(
        &self,
        triangle: TriangleKey,
        vertex: VertexKey,
    ) -> Result<VoronoiCell, VoronoiError> {
        voronoi::voronoi_cell(self, triangle, vertex)
    }

    /// The connected vertices around `vertex`, or `None` for a hull vertex.
    ///
    /// `triangle` must be a filled triangle owning `vertex` as a corner.
    ///
    /// # Errors
    ///
    /// [`TopologyError::NotACorner`] when it does not, or a walk failure.
    pub fn vertex_neighbors(
        &self,
        triangle: TriangleKey,
        vertex: VertexKey,
    ) -> Result<Option<Vec<VertexKey>>, TopologyError> {
        neighborhood::vertex_neighbors(self, triangle, vertex)
    }

    /// Bounds of the inserted point set, `None` while empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
    }

    /// Iterates the convex hull vertices in hull order, each one once.
    ///
    /// Empty before two points exist; during the collinear bootstrap the
    /// "hull" is the whole chain of points.
    #[must_use]
    pub fn convex_hull_vertices(&self) -> ConvexHullVertices<'_> {
        ConvexHullVertices {
            triangulation: self,
            start: self.hull_start,
            current: self.hull_start,
            remaining: self.triangles.len() + 1,
            seen: FastHashSet::default(),
        }
    }

    /// Number of vertices on the convex hull.
    #[must_use]
    pub fn convex_hull_size(&self) -> usize {
        self.convex_hull_vertices().count()
    }

    /// Number of distinct inserted points.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.points.len()
    }

    /// Number of filled triangles (halfplanes excluded).
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.triangles
            .values()
            .filter(|node| !node.is_halfplane())
            .count()
    }

    /// Monotone counter incremented once per accepted insertion.
    ///
    /// Snapshot it, insert more points, then ask
    /// [`updated_triangles`](Self::updated_triangles) what changed.
    #[must_use]
    pub const fn update_counter(&self) -> u64 {
        self.update_counter
    }

    /// Filled triangles touched by an insertion newer than `since`.
    pub fn updated_triangles(&self, since: u64) -> impl Iterator<Item = TriangleKey> + '_ {
        self.triangles
            .iter()
            .filter(move |(_, node)| !node.is_halfplane() && node.generation > since)
            .map(|(key, _)| key)
    }

    /// The point behind a vertex key, if it is still live.
    #[must_use]
    pub fn get_point(&self, vertex: VertexKey) -> Option<Point> {
        self.points.get(vertex).copied()
    }

    /// The three corner points of a filled triangle.
    ///
    /// `None` for a stale key or a halfplane.
    #[must_use]
    pub fn get_triangle(&self, triangle: TriangleKey) -> Option<[Point; 3]> {
        let node = self.triangles.get(triangle)?;
        let c = node.c?;
        Some([
            *self.points.get(node.a)?,
            *self.points.get(node.b)?,
            *self.points.get(c)?,
        ])
    }

    /// Read access to a mesh node, halfplanes included.
    #[must_use]
    pub fn triangle_node(&self, triangle: TriangleKey) -> Option<&TriangleNode> {
        self.triangles.get(triangle)
    }

    /// Iterates every live mesh node, halfplanes included.
    pub fn nodes(&self) -> impl Iterator<Item = (TriangleKey, &TriangleNode)> {
        self.triangles.iter()
    }

    /// Iterates every inserted point.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexKey, &Point)> {
        self.points.iter()
    }

    /// The current bootstrap state.
    #[must_use]
    pub const fn state(&self) -> &ConstructionState {
        &self.state
    }

    // ---- internal plumbing -------------------------------------------------

    /// Where a locate walk starts: the last insertion site, or any hull node.
    pub(crate) fn locate_start(&self) -> Option<TriangleKey> {
        self.start_triangle
            .filter(|key| self.triangles.contains_key(*key))
            .or(self.hull_start)
    }

    pub(crate) fn node(&self, key: TriangleKey) -> Result<&TriangleNode, TopologyError> {
        self.triangles
            .get(key)
            .ok_or(TopologyError::MissingTriangle(key))
    }

    pub(crate) fn node_mut(&mut self, key: TriangleKey) -> Result<&mut TriangleNode, TopologyError> {
        self.triangles
            .get_mut(key)
            .ok_or(TopologyError::MissingTriangle(key))
    }

    pub(crate) fn point(&self, key: VertexKey) -> Result<Point, TopologyError> {
        self.points
            .get(key)
            .copied()
            .ok_or(TopologyError::MissingVertex(key))
    }

    /// Allocates a filled triangle; the corners must be counter-clockwise.
    pub(crate) fn make_filled(
        &mut self,
        a: VertexKey,
        b: VertexKey,
        c: VertexKey,
    ) -> Result<TriangleKey, TopologyError> {
        let pa = self.point(a)?;
        let pb = self.point(b)?;
        let pc = self.point(c)?;
        let mut node = TriangleNode::filled(a, b, c, self.update_counter);
        node.circumcircle = Some(Circumcircle::of(&pa, &pb, &pc));
        Ok(self.triangles.insert(node))
    }

    /// Allocates a halfplane left of the hull edge `a -> b`.
    pub(crate) fn make_halfplane(&mut self, a: VertexKey, b: VertexKey) -> TriangleKey {
        self.triangles
            .insert(TriangleNode::halfplane(a, b, self.update_counter))
    }

    /// Turns a halfplane into a filled triangle with third corner `c`.
    ///
    /// Idempotent when the node already carries `c`.
    pub(crate) fn promote(&mut self, key: TriangleKey, c: VertexKey) -> Result<(), TopologyError> {
        let generation = self.update_counter;
        let node = self.node(key)?;
        if node.c == Some(c) {
            return Ok(());
        }
        let (a, b) = (node.a, node.b);
        let pa = self.point(a)?;
        let pb = self.point(b)?;
        let pc = self.point(c)?;
        let circ = Circumcircle::of(&pa, &pb, &pc);
        let node = self.node_mut(key)?;
        node.c = Some(c);
        node.circumcircle = Some(circ);
        node.generation = generation;
        Ok(())
    }

    /// Refreshes the cached circumcircle after a corner change.
    pub(crate) fn recompute_circumcircle(&mut self, key: TriangleKey) -> Result<(), TopologyError> {
        let node = self.node(key)?;
        let Some(c) = node.c else {
            return Ok(());
        };
        let pa = self.point(node.a)?;
        let pb = self.point(node.b)?;
        let pc = self.point(c)?;
        let circ = Circumcircle::of(&pa, &pb, &pc);
        self.node_mut(key)?.circumcircle = Some(circ);
        Ok(())
    }

    /// Rewires the slot of `neighbor` holding `old` to point at `new`.
    pub(crate) fn switch_neighbors(
        &mut self,
        neighbor: Option<TriangleKey>,
        old: TriangleKey,
        new: TriangleKey,
    ) -> Result<(), TopologyError> {
        let key = neighbor.ok_or(TopologyError::UnsetNeighbor(old))?;
        if self.node_mut(key)?.switch_neighbor(old, new) {
            Ok(())
        } else {
            Err(TopologyError::NeighborRewire {
                triangle: key,
                missing: old,
            })
        }
    }
}

/// Iterator over convex hull vertices, produced by
/// [`DelaunayTriangulation::convex_hull_vertices`].
///
/// Walks the ring of halfplanes clockwise and yields each hull vertex once.
/// On the collinear bootstrap chain both sides of the ring carry the same
/// vertices, so repeats are skipped.
#[derive(Clone, Debug)]
pub struct ConvexHullVertices<'a> {
    triangulation: &'a DelaunayTriangulation,
    start: Option<TriangleKey>,
    current: Option<TriangleKey>,
    remaining: usize,
    seen: FastHashSet<VertexKey>,
}

impl Iterator for ConvexHullVertices<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining == 0 {
                return None;
            }
            self.remaining -= 1;
            let key = self.current?;
            let node = self.triangulation.triangles.get(key)?;
            self.current = match node.bc_next {
                next if next == self.start => None,
                next => next,
            };
            if self.seen.insert(node.a) {
                return self.triangulation.points.get(node.a).copied();
            }
        }
    }
}
