//! Axis-aligned bounding box over the inserted point set.

use crate::geometry::point::Point;

/// The axis-aligned rectangle enclosing every point inserted so far.
///
/// Maintained incrementally by the triangulation; `z` bounds ride along so
/// callers can scale height maps without rescanning the point set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Corner with the smallest coordinates.
    pub min: Point,
    /// Corner with the largest coordinates.
    pub max: Point,
}

impl BoundingBox {
    /// A box containing exactly one point.
    #[inline]
    #[must_use]
    pub const fn of_point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// Grows the box to contain `p`.
    pub fn expand(&mut self, p: &Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Box width along `x`.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Box height along `y`.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns `true` if `p` lies inside the box in the plane.
    #[must_use]
    pub fn contains_xy(&self, p: &Point) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }
}
