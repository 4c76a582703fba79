//! Walking the ring of triangles around a mesh vertex.

use crate::core::collections::FastHashSet;
use crate::core::errors::TopologyError;
use crate::core::triangle::{Corner, TriangleKey, VertexKey};
use crate::core::triangulation::DelaunayTriangulation;

/// The next triangle around `vertex`, continuing a walk that came from
/// `prev`.
///
/// The walk keeps a consistent side of the vertex; when the preferred
/// neighbor is where the walk came from, the other edge through `vertex` is
/// taken instead. A halfplane is returned as-is: the ring around a hull
/// vertex is open and callers stop there.
pub fn next_neighbor(
    tri: &DelaunayTriangulation,
    current: TriangleKey,
    vertex: VertexKey,
    prev: Option<TriangleKey>,
) -> Result<TriangleKey, TopologyError> {
    let node = tri.node(current)?;
    let corner = node.corner_of(vertex).ok_or(TopologyError::NotACorner {
        vertex,
        triangle: current,
    })?;
    let primary = match corner {
        Corner::A => node.ca_next,
        Corner::B => node.ab_next,
        Corner::C => node.bc_next,
    };
    let primary = primary.ok_or(TopologyError::UnsetNeighbor(current))?;
    if prev != Some(primary) {
        return Ok(primary);
    }
    let secondary = match corner {
        Corner::A => node.ab_next,
        Corner::B => node.bc_next,
        Corner::C => node.ca_next,
    };
    secondary.ok_or(TopologyError::UnsetNeighbor(current))
}

/// Collects the ring of filled triangles sharing `vertex`, in walk order.
///
/// Returns `None` when the walk reaches a halfplane, which means `vertex`
/// lies on the convex hull and its ring is open.
///
/// # Errors
///
/// [`TopologyError::NotACorner`] when `start` does not own `vertex`, and
/// [`TopologyError::UnclosedWalk`] when the walk outruns the mesh without
/// returning to `start`.
pub fn vertex_neighborhood(
    tri: &DelaunayTriangulation,
    start: TriangleKey,
    vertex: VertexKey,
) -> Result<Option<Vec<TriangleKey>>, TopologyError> {
    if tri.node(start)?.corner_of(vertex).is_none() {
        return Err(TopologyError::NotACorner {
            vertex,
            triangle: start,
        });
    }
    let mut ring = vec![start];
    let mut prev = None;
    let mut current = start;
    loop {
        let next = next_neighbor(tri, current, vertex, prev)?;
        if next == start {
            return Ok(Some(ring));
        }
        if tri.node(next)?.is_halfplane() {
            return Ok(None);
        }
        if ring.len() > tri.triangles.len() {
            return Err(TopologyError::UnclosedWalk { vertex });
        }
        ring.push(next);
        prev = Some(current);
        current = next;
    }
}

/// The vertices connected to `vertex` by a mesh edge, in ring order.
///
/// `None` when `vertex` lies on the convex hull.
pub fn vertex_neighbors(
    tri: &DelaunayTriangulation,
    start: TriangleKey,
    vertex: VertexKey,
) -> Result<Option<Vec<VertexKey>>, TopologyError> {
    let Some(ring) = vertex_neighborhood(tri, start, vertex)? else {
        return Ok(None);
    };
    let mut seen = FastHashSet::default();
    let mut connected = Vec::with_capacity(ring.len());
    for key in ring {
        let node = tri.node(key)?;
        let c = node.c.ok_or(TopologyError::ExpectedFilled(key))?;
        // The corner after `vertex` in cyclic order shares an edge with it.
        let follower = match node.corner_of(vertex) {
            Some(Corner::A) => node.b,
            Some(Corner::B) => c,
            Some(Corner::C) => node.a,
            None => {
                return Err(TopologyError::NotACorner {
                    vertex,
                    triangle: key,
                })
            }
        };
        if seen.insert(follower) {
            connected.push(follower);
        }
    }
    Ok(Some(connected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point;

    fn meshed_grid() -> DelaunayTriangulation {
        let mut tin = DelaunayTriangulation::new();
        for p in [
            point!(0.0, 0.0),
            point!(10.0, 0.0),
            point!(10.0, 10.0),
            point!(0.0, 10.0),
            point!(5.0, 5.0),
        ] {
            tin.insert(p).unwrap();
        }
        tin
    }

    fn key_of(tin: &DelaunayTriangulation, x: f64, y: f64) -> VertexKey {
        tin.vertices()
            .find(|(_, p)| p.same_xy(&point!(x, y)))
            .map(|(k, _)| k)
            .unwrap()
    }

    fn triangle_with_corner(tin: &DelaunayTriangulation, vertex: VertexKey) -> TriangleKey {
        tin.nodes()
            .find(|(_, n)| !n.is_halfplane() && n.corner_of(vertex).is_some())
            .map(|(k, _)| k)
            .unwrap()
    }

    #[test]
    fn interior_vertex_ring_closes() {
        let tin = meshed_grid();
        let center = key_of(&tin, 5.0, 5.0);
        let start = triangle_with_corner(&tin, center);
        let ring = vertex_neighborhood(&tin, start, center).unwrap().unwrap();
        assert_eq!(ring.len(), 4);
        let connected = vertex_neighbors(&tin, start, center).unwrap().unwrap();
        assert_eq!(connected.len(), 4);
        assert!(!connected.contains(&center));
    }

    #[test]
    fn hull_vertex_ring_is_open() {
        let tin = meshed_grid();
        let corner = key_of(&tin, 0.0, 0.0);
        let start = triangle_with_corner(&tin, corner);
        assert_eq!(vertex_neighborhood(&tin, start, corner).unwrap(), None);
    }

    #[test]
    fn hull_vertex_never_reports_a_closed_ring() {
        // The walk must hit a halfplane from either owning triangle, not
        // bounce back along the arc and pretend the ring closed.
        let tin = meshed_grid();
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)] {
            let corner = key_of(&tin, x, y);
            for (key, node) in tin.nodes() {
                if node.is_halfplane() || node.corner_of(corner).is_none() {
                    continue;
                }
                assert_eq!(vertex_neighborhood(&tin, key, corner).unwrap(), None);
                assert_eq!(vertex_neighbors(&tin, key, corner).unwrap(), None);
            }
        }
    }

    #[test]
    fn wrong_start_triangle_is_rejected() {
        let tin = meshed_grid();
        let center = key_of(&tin, 5.0, 5.0);
        let corner = key_of(&tin, 0.0, 0.0);
        let start = triangle_with_corner(&tin, center);
        // A triangle owning the center does not necessarily own the corner
        // opposite it; find one that truly misses `corner`.
        let miss = tin
            .nodes()
            .find(|(_, n)| !n.is_halfplane() && n.corner_of(corner).is_none())
            .map(|(k, _)| k)
            .unwrap();
        let err = vertex_neighborhood(&tin, miss, corner).unwrap_err();
        assert!(matches!(err, TopologyError::NotACorner { .. }));
        // And the valid start still works.
        assert!(vertex_neighborhood(&tin, start, center).is_ok());
    }
}
