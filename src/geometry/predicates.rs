//! Planar geometric predicates.
//!
//! Every decision the mesh makes reduces to the two predicates in this
//! module: the point/segment classification drives the locator walk and the
//! hull extension, the circumcircle containment test drives edge flipping.
//! Both are plain `f64` sign tests; determinism (same inputs, same answer) is
//! what the topology relies on, not exactness.

use crate::geometry::point::Point;

/// Position of a query point relative to a directed segment `a -> b`.
///
/// The collinear cases are split three ways because the collinear bootstrap
/// phase of the builder needs to know *where along the line* a new point
/// falls, not merely that it is collinear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentPosition {
    /// Strictly left of the directed line `a -> b`.
    Left,
    /// Strictly right of the directed line `a -> b`.
    Right,
    /// Collinear and between `a` and `b` (endpoints included).
    OnSegment,
    /// Collinear, beyond `a` on the far side from `b`.
    InFrontOfA,
    /// Collinear, beyond `b` on the far side from `a`.
    BehindB,
    /// The segment is degenerate (`a` and `b` coincide in the plane).
    Degenerate,
}

impl std::fmt::Display for SegmentPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::OnSegment => "ON_SEGMENT",
            Self::InFrontOfA => "IN_FRONT_OF_A",
            Self::BehindB => "BEHIND_B",
            Self::Degenerate => "DEGENERATE",
        };
        write!(f, "{name}")
    }
}

/// Classifies point `p` against the directed segment `a -> b`.
///
/// The side test is the sign of the cross product of `b - a` with `p - a`;
/// when that vanishes the point is collinear and the dominant axis of the
/// segment decides whether `p` is in front of `a`, behind `b`, or between
/// them. Only `(x, y)` participate; `z` is ignored.
///
/// The result is deterministic: two calls with identical inputs always agree,
/// which the locator and the flip pass depend on.
#[must_use]
pub fn point_segment_position(a: &Point, b: &Point, p: &Point) -> SegmentPosition {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let cross = dy * (p.x - a.x) - dx * (p.y - a.y);

    if cross < 0.0 {
        return SegmentPosition::Left;
    }
    if cross > 0.0 {
        return SegmentPosition::Right;
    }

    // Collinear: order along the dominant axis of the segment.
    if dx > 0.0 {
        return collinear_order(p.x, a.x, b.x);
    }
    if dx < 0.0 {
        return collinear_order(-p.x, -a.x, -b.x);
    }
    if dy > 0.0 {
        return collinear_order(p.y, a.y, b.y);
    }
    if dy < 0.0 {
        return collinear_order(-p.y, -a.y, -b.y);
    }

    SegmentPosition::Degenerate
}

/// Orders a collinear point along one axis, with `av < bv` after sign fixup.
fn collinear_order(pv: f64, av: f64, bv: f64) -> SegmentPosition {
    if pv < av {
        SegmentPosition::InFrontOfA
    } else if bv < pv {
        SegmentPosition::BehindB
    } else {
        SegmentPosition::OnSegment
    }
}

/// The circle through a triangle's three corners, cached per mesh node.
///
/// Stored as center plus squared radius so the containment test needs no
/// square root. A degenerate (collinear) corner set yields an infinite
/// radius, which makes every containment test succeed and lets the flip pass
/// dissolve sliver triangles instead of keeping them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circumcircle {
    /// Circumcenter in the plane (`z` is always zero).
    pub center: Point,
    /// Squared circumradius; `f64::INFINITY` for collinear corners.
    pub radius_squared: f64,
}

impl Circumcircle {
    /// Computes the circumcircle of the triangle `a`, `b`, `c`.
    #[must_use]
    pub fn of(a: &Point, b: &Point, c: &Point) -> Self {
        let u = ((a.x - b.x) * (a.x + b.x) + (a.y - b.y) * (a.y + b.y)) / 2.0;
        let v = ((b.x - c.x) * (b.x + c.x) + (b.y - c.y) * (b.y + c.y)) / 2.0;
        let den = (a.x - b.x) * (b.y - c.y) - (b.x - c.x) * (a.y - b.y);

        if den == 0.0 {
            // Collinear corners: treat as an infinite circle.
            return Self {
                center: Point::xy((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
                radius_squared: f64::INFINITY,
            };
        }

        let cx = (u * (b.y - c.y) - v * (a.y - b.y)) / den;
        let cy = (v * (a.x - b.x) - u * (b.x - c.x)) / den;
        let center = Point::xy(cx, cy);
        let radius_squared = center.distance_xy_squared(a);
        Self {
            center,
            radius_squared,
        }
    }

    /// Returns `true` if `p` lies strictly inside this circle.
    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        self.radius_squared > self.center.distance_xy_squared(p)
    }
}
