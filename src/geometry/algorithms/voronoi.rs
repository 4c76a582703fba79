//! Voronoi cells derived from the Delaunay mesh.
//!
//! The Voronoi diagram is the dual of the triangulation: the cell of an
//! interior vertex is the polygon of circumcenters of the triangles around
//! it. Hull features have unbounded cells; the cell edge dual to a hull edge
//! is reported as a long open segment running from the adjacent circumcenter
//! away from the mesh.

use thiserror::Error;

use crate::core::algorithms::neighborhood;
use crate::core::errors::TopologyError;
use crate::core::triangle::{TriangleKey, VertexKey};
use crate::core::triangulation::DelaunayTriangulation;
use crate::geometry::point::Point;

/// How far an unbounded cell edge is extended from its circumcenter.
pub const RAY_EXTENT: f64 = 500.0;

/// One Voronoi cell, or the unbounded cell edge dual to a hull edge.
#[derive(Clone, Debug, PartialEq)]
pub enum VoronoiCell {
    /// Closed cell of an interior vertex: circumcenters in ring order.
    Polygon(Vec<Point>),
    /// Unbounded cell edge dual to a hull edge, start and far end.
    OpenSegment([Point; 2]),
}

/// Failure to build a Voronoi cell.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum VoronoiError {
    /// The vertex lies on the convex hull; its cell is unbounded.
    #[error("the vertex lies on the convex hull, its cell is unbounded")]
    UnboundedVertex,
    /// The halfplane borders no filled triangle (collinear bootstrap).
    #[error("no filled triangle borders the halfplane")]
    NoAdjacentTriangle,
    /// The walk tripped over mesh corruption.
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Builds the Voronoi cell of `vertex` as seen from `triangle`.
///
/// For a filled `triangle` owning `vertex` the result is the closed polygon
/// of circumcenters around `vertex`. For a halfplane the result is the open
/// cell edge dual to its hull edge, directed away from the mesh; `vertex` is
/// not consulted in that case.
pub fn voronoi_cell(
    tri: &DelaunayTriangulation,
    triangle: TriangleKey,
    vertex: VertexKey,
) -> Result<VoronoiCell, VoronoiError> {
    let node = tri.node(triangle)?;
    if !node.is_halfplane() {
        let ring = neighborhood::vertex_neighborhood(tri, triangle, vertex)?
            .ok_or(VoronoiError::UnboundedVertex)?;
        let mut centers = Vec::with_capacity(ring.len());
        for key in ring {
            let circle = tri
                .node(key)?
                .circumcircle
                .ok_or(TopologyError::ExpectedFilled(key))?;
            centers.push(circle.center);
        }
        return Ok(VoronoiCell::Polygon(centers));
    }

    // Hull edge: the dual cell edge is the perpendicular bisector ray.
    let (a, b) = (node.a, node.b);
    let neighbor = hull_neighbor(tri, triangle)?;
    let neighbor_node = tri.node(neighbor)?;
    let c = neighbor_node
        .c
        .ok_or(TopologyError::ExpectedFilled(neighbor))?;
    let third = [neighbor_node.a, neighbor_node.b, c]
        .into_iter()
        .find(|vk| *vk != a && *vk != b)
        .ok_or(TopologyError::FlipMismatch)?;
    let center = tri
        .node(neighbor)?
        .circumcircle
        .ok_or(TopologyError::ExpectedFilled(neighbor))?
        .center;

    let pa = tri.point(a)?;
    let pb = tri.point(b)?;
    let pt = tri.point(third)?;
    let (ex, ey) = (pb.x - pa.x, pb.y - pa.y);
    let length = (ex * ex + ey * ey).sqrt();
    // Left normal of the hull edge, unit length.
    let (mut nx, mut ny) = (-ey / length, ex / length);
    // Point away from the interior witness.
    if (pt.x - pa.x) * nx + (pt.y - pa.y) * ny > 0.0 {
        nx = -nx;
        ny = -ny;
    }
    let far = Point::xy(center.x + RAY_EXTENT * nx, center.y + RAY_EXTENT * ny);
    Ok(VoronoiCell::OpenSegment([Point::xy(center.x, center.y), far]))
}

/// The filled triangle adjacent to a halfplane, each slot checked once.
fn hull_neighbor(
    tri: &DelaunayTriangulation,
    halfplane: TriangleKey,
) -> Result<TriangleKey, VoronoiError> {
    for neighbor in tri.node(halfplane)?.neighbors().into_iter().flatten() {
        if !tri.node(neighbor)?.is_halfplane() {
            return Ok(neighbor);
        }
    }
    Err(VoronoiError::NoAdjacentTriangle)
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

    #[test]
    fn interior_cell_is_circumcenter_polygon() {
        let tin = meshed_grid();
        let center = key_of(&tin, 5.0, 5.0);
        let start = tin
            .nodes()
            .find(|(_, n)| !n.is_halfplane() && n.corner_of(center).is_some())
            .map(|(k, _)| k)
            .unwrap();
        let cell = voronoi_cell(&tin, start, center).unwrap();
        let VoronoiCell::Polygon(corners) = cell else {
            panic!("expected a closed cell");
        };
        assert_eq!(corners.len(), 4);
        for expected in [
            point!(5.0, 0.0),
            point!(10.0, 5.0),
            point!(5.0, 10.0),
            point!(0.0, 5.0),
        ] {
            assert!(
                corners.iter().any(|p| p.same_xy(&expected)),
                "missing cell corner {expected:?}"
            );
        }
    }

    #[test]
    fn hull_vertex_cell_is_unbounded() {
        let tin = meshed_grid();
        let corner = key_of(&tin, 0.0, 0.0);
        let start = tin
            .nodes()
            .find(|(_, n)| !n.is_halfplane() && n.corner_of(corner).is_some())
            .map(|(k, _)| k)
            .unwrap();
        assert_eq!(
            voronoi_cell(&tin, start, corner).unwrap_err(),
            VoronoiError::UnboundedVertex
        );
    }

    #[test]
    fn hull_edge_cell_points_away_from_mesh() {
        let tin = meshed_grid();
        let a = key_of(&tin, 0.0, 0.0);
        let b = key_of(&tin, 10.0, 0.0);
        // The halfplane over the bottom hull edge.
        let (hp, _) = tin
            .nodes()
            .find(|(_, n)| {
                n.is_halfplane() && [n.a, n.b].contains(&a) && [n.a, n.b].contains(&b)
            })
            .unwrap();
        let cell = voronoi_cell(&tin, hp, a).unwrap();
        let VoronoiCell::OpenSegment([start, far]) = cell else {
            panic!("expected an open cell edge");
        };
        assert!(start.same_xy(&point!(5.0, 0.0)));
        assert!((far.y - (-RAY_EXTENT)).abs() < 1e-9);
        assert!((far.x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn collinear_chain_has_no_adjacent_triangle() {
        let mut tin = DelaunayTriangulation::new();
        tin.insert(point!(0.0, 0.0)).unwrap();
        tin.insert(point!(1.0, 0.0)).unwrap();
        let (hp, _) = tin.nodes().next().unwrap();
        assert_eq!(
            voronoi_cell(&tin, hp, key_of(&tin, 0.0, 0.0)).unwrap_err(),
            VoronoiError::NoAdjacentTriangle
        );
    }
}
