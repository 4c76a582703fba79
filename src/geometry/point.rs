//! The sampled terrain point type used throughout the triangulation.
//!
//! A [`Point`] is a 2D location with a carried height: the triangulation is
//! planar and only ever reasons about `(x, y)`, while `z` rides along for
//! height interpolation. Points are plain `Copy` values; the mesh stores them
//! in an arena and refers to them by key, never by reference.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;

/// A 2D point with a carried height value.
///
/// Equality and ordering used by the triangulation are defined over `(x, y)`
/// only; `z` is payload. The total order (x first, then y as tie-break) is
/// what the deduplicating vertex index and the collinear bootstrap chain rely
/// on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Carried height; never inspected by the mesh topology.
    pub z: f64,
}

impl Point {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a point in the plane with `z = 0`.
    #[inline]
    #[must_use]
    pub const fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Squared Euclidean distance in the plane, ignoring `z`.
    #[inline]
    #[must_use]
    pub fn distance_xy_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance in the plane, ignoring `z`.
    #[inline]
    #[must_use]
    pub fn distance_xy(&self, other: &Self) -> f64 {
        self.distance_xy_squared(other).sqrt()
    }

    /// Total order over `(x, y)`: `x` first, `y` breaks ties.
    ///
    /// The order is total even in the presence of `-0.0`/`NaN` thanks to
    /// [`OrderedFloat`], so it can back a `BTreeMap` key.
    #[inline]
    #[must_use]
    pub fn cmp_xy(&self, other: &Self) -> Ordering {
        self.ordered_xy().cmp(&other.ordered_xy())
    }

    /// Returns `true` if `self` and `other` coincide in the plane.
    #[inline]
    #[must_use]
    pub fn same_xy(&self, other: &Self) -> bool {
        self.ordered_xy() == other.ordered_xy()
    }

    /// The `(x, y)` pair as a totally ordered key.
    #[inline]
    #[must_use]
    pub(crate) fn ordered_xy(&self) -> (OrderedFloat<f64>, OrderedFloat<f64>) {
        (OrderedFloat(self.x), OrderedFloat(self.y))
    }
}

/// Convenience constructor for [`Point`] values.
///
/// ```
/// use tinmesh::point;
///
/// let flat = point!(1.0, 2.0);
/// let tall = point!(1.0, 2.0, 7.5);
/// assert_eq!(flat.z, 0.0);
/// assert_eq!(tall.z, 7.5);
/// ```
#[macro_export]
macro_rules! point {
    ($x:expr, $y:expr) => {
        $crate::geometry::point::Point::new($x, $y, 0.0)
    };
    ($x:expr, $y:expr, $z:expr) => {
        $crate::geometry::point::Point::new($x, $y, $z)
    };
}
