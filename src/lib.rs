//! # tinmesh
//!
//! An incremental planar Delaunay triangulation with carried heights, built
//! for terrain (TIN) workloads of thousands to hundreds of thousands of
//! sample points.
//!
//! Points are inserted one at a time. Each insertion walks to the affected
//! region (expected O(sqrt n) from a nearby start), rewires the mesh there
//! and restores the Delaunay property with local edge flips, so the
//! triangulation is valid after every insertion. The mesh is bounded by a
//! ring of halfplane nodes over the convex hull edges, which keeps every
//! neighbor link total and makes outside-the-hull answers explicit values
//! rather than special cases.
//!
//! On top of the mesh sit the terrain queries: point location, containment,
//! height interpolation, nearest inserted point, convex hull enumeration,
//! Voronoi cells and change tracking for incremental consumers.
//!
//! # Example
//!
//! ```
//! use tinmesh::prelude::*;
//!
//! let mut tin = DelaunayTriangulation::new();
//! tin.insert(point!(0.0, 0.0, 10.0))?;
//! tin.insert(point!(8.0, 0.0, 10.0))?;
//! tin.insert(point!(4.0, 6.0, 22.0))?;
//! tin.insert(point!(4.0, 2.0, 14.0))?;
//!
//! assert_eq!(tin.number_of_triangles(), 3);
//! assert!(tin.contains(&point!(4.0, 1.0)));
//! let height = tin.height_at(&point!(4.0, 2.0))?;
//! assert_eq!(height, 14.0);
//! # Ok::<(), tinmesh::core::errors::QueryError>(())
//! ```

pub mod core {
    //! The mesh data structure and its algorithms.

    pub mod algorithms {
        //! Insertion, location, flipping and neighborhood walks.

        pub(crate) mod flips;
        pub(crate) mod insertion;
        pub(crate) mod locate;
        pub mod neighborhood;
    }

    pub mod collections;
    pub mod errors;
    pub mod triangle;
    pub mod triangulation;
}

pub mod geometry {
    //! Value types and geometric predicates.

    pub mod algorithms {
        //! Geometry derived from a finished mesh.

        pub mod voronoi;
    }

    pub mod bounding_box;
    pub mod point;
    pub mod predicates;
}

pub mod prelude {
    //! Convenient glob import for the common types.
    //!
    //! ```
    //! use tinmesh::prelude::*;
    //!
    //! let mut tin = DelaunayTriangulation::new();
    //! tin.insert(point!(1.0, 2.0, 3.0)).unwrap();
    //! ```

    pub use crate::core::errors::{QueryError, TopologyError};
    pub use crate::core::triangle::{Corner, TriangleKey, TriangleNode, VertexKey};
    pub use crate::core::triangulation::{
        ConstructionState, ConvexHullVertices, DelaunayTriangulation,
    };
    pub use crate::geometry::algorithms::voronoi::{VoronoiCell, VoronoiError};
    pub use crate::geometry::bounding_box::BoundingBox;
    pub use crate::geometry::point::Point;
    pub use crate::geometry::predicates::{point_segment_position, Circumcircle, SegmentPosition};
    pub use crate::point;
}
