//! Error types for mesh topology and queries.

use thiserror::Error;

use crate::core::triangle::{TriangleKey, VertexKey};

/// Structural corruption of the mesh.
///
/// Any of these indicates an internal invariant has been broken (a dangling
/// key, a neighbor link pointing the wrong way). They are not recoverable by
/// retrying; the triangulation that produced one should be rebuilt.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    /// A triangle key addressed a tombstoned or foreign arena slot.
    #[error("triangle key {0:?} is not present in the mesh")]
    MissingTriangle(TriangleKey),
    /// A vertex key addressed a tombstoned or foreign arena slot.
    #[error("vertex key {0:?} is not present in the point arena")]
    MissingVertex(VertexKey),
    /// A neighbor slot was unset where a link is required.
    #[error("a neighbor slot of triangle {0:?} is unset")]
    UnsetNeighbor(TriangleKey),
    /// A neighbor rewire found no slot holding the expected old key.
    #[error("triangle {triangle:?} holds no neighbor slot for {missing:?}")]
    NeighborRewire {
        /// The triangle whose slots were searched.
        triangle: TriangleKey,
        /// The old neighbor that was expected in one of them.
        missing: TriangleKey,
    },
    /// Two triangles selected for an edge flip share no edge vertex.
    #[error("flip candidates share no edge vertex")]
    FlipMismatch,
    /// A walk was started around a vertex the triangle does not own.
    #[error("vertex {vertex:?} is not a corner of triangle {triangle:?}")]
    NotACorner {
        /// The vertex the walk was asked to circle.
        vertex: VertexKey,
        /// The starting triangle.
        triangle: TriangleKey,
    },
    /// A neighborhood walk visited more triangles than the mesh holds.
    #[error("neighborhood walk around vertex {vertex:?} did not close")]
    UnclosedWalk {
        /// The vertex being circled.
        vertex: VertexKey,
    },
    /// A locate walk took more steps than the mesh has nodes.
    #[error("point location walk exceeded the mesh size")]
    WalkOverrun,
    /// The mesh is meshed but has no usable start triangle.
    #[error("the mesh has no start triangle")]
    NoStartTriangle,
    /// A filled triangle was required but a halfplane was found.
    #[error("expected a filled triangle, found halfplane {0:?}")]
    ExpectedFilled(TriangleKey),
}

/// Failure of a point query against a valid mesh.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The triangulation holds fewer than three non-collinear points.
    #[error("the triangulation has no filled triangles yet")]
    EmptyTriangulation,
    /// The query point lies outside the convex hull.
    #[error("the query point lies outside the convex hull")]
    OutsideHull,
    /// The containing triangle has no planar extent to interpolate over.
    #[error("the containing triangle is degenerate in the plane")]
    DegenerateTriangle,
    /// The query tripped over mesh corruption.
    #[error(transparent)]
    Topology(#[from] TopologyError),
}
