//! Point location by walking across triangle neighbors.
//!
//! From any start node the walk repeatedly crosses an edge that separates the
//! query point from the current triangle. On a Delaunay mesh of n
//! well-distributed points the expected walk length from a nearby start is
//! O(sqrt n); spatially coherent batches that reuse the previous result as the
//! next start run much shorter walks.

use crate::core::errors::TopologyError;
use crate::core::triangle::TriangleKey;
use crate::core::triangulation::DelaunayTriangulation;
use crate::geometry::point::Point;
use crate::geometry::predicates::{point_segment_position, SegmentPosition};

/// Walks from `start` to the node containing `p`.
///
/// Returns a filled triangle when `p` lies inside the hull, or the halfplane
/// whose hull edge faces `p` when it lies outside.
pub(crate) fn walk_from(
    tri: &DelaunayTriangulation,
    start: TriangleKey,
    p: &Point,
) -> Result<TriangleKey, TopologyError> {
    let mut current = start;
    if tri.node(current)?.is_halfplane() {
        match step_inward(tri, current)? {
            Some(inner) => current = inner,
            // No filled triangle borders this halfplane (collinear chain).
            None => return Ok(current),
        }
    }
    let mut remaining = tri.triangles.len() + 1;
    loop {
        if remaining == 0 {
            return Err(TopologyError::WalkOverrun);
        }
        remaining -= 1;
        match next_toward(tri, current, p)? {
            None => return Ok(current),
            Some(next) => {
                if tri.node(next)?.is_halfplane() {
                    return Ok(next);
                }
                current = next;
            }
        }
    }
}

/// A filled triangle adjacent to the halfplane `key`, if any exists.
pub(crate) fn step_inward(
    tri: &DelaunayTriangulation,
    key: TriangleKey,
) -> Result<Option<TriangleKey>, TopologyError> {
    for neighbor in tri.node(key)?.neighbors().into_iter().flatten() {
        if !tri.node(neighbor)?.is_halfplane() {
            return Ok(Some(neighbor));
        }
    }
    Ok(None)
}

/// The neighbor to step into from the filled triangle `key`, or `None` when
/// `key` already contains `p`.
///
/// Interior neighbors are preferred over hull crossings so the walk only
/// leaves the hull when no filled triangle can still contain the point.
fn next_toward(
    tri: &DelaunayTriangulation,
    key: TriangleKey,
    p: &Point,
) -> Result<Option<TriangleKey>, TopologyError> {
    let node = tri.node(key)?;
    let c = node.c.ok_or(TopologyError::ExpectedFilled(key))?;
    let pa = tri.point(node.a)?;
    let pb = tri.point(node.b)?;
    let pc = tri.point(c)?;
    let edges = [
        (pa, pb, node.ab_next),
        (pb, pc, node.bc_next),
        (pc, pa, node.ca_next),
    ];
    for (from, to, neighbor) in edges {
        if point_segment_position(&from, &to, p) == SegmentPosition::Right {
            let next = neighbor.ok_or(TopologyError::UnsetNeighbor(key))?;
            if !tri.node(next)?.is_halfplane() {
                return Ok(Some(next));
            }
        }
    }
    for (from, to, neighbor) in edges {
        if point_segment_position(&from, &to, p) == SegmentPosition::Right {
            return Ok(Some(neighbor.ok_or(TopologyError::UnsetNeighbor(key))?));
        }
    }
    Ok(None)
}
