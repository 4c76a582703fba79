//! Incremental insertion: bootstrap states, hull extension, interior split.
//!
//! The first points are held in bootstrap states until three non-collinear
//! points exist: one buffered point, then a chain of halfplane pairs covering
//! the collinear segment. The first off-line point promotes the chain into a
//! fan of filled triangles and the mesh never leaves the `Meshed` state after
//! that.
//!
//! In the `Meshed` state an insertion locates the affected node and either
//! splits a filled triangle in three (interior hit), subdivides a hull edge
//! (hit exactly on the boundary), or swallows a run of hull halfplanes into a
//! fan of new triangles capped by two fresh halfplanes (exterior hit).

use std::cmp::Ordering;

use crate::core::algorithms::locate;
use crate::core::errors::TopologyError;
use crate::core::triangle::{TriangleKey, VertexKey};
use crate::core::triangulation::{ConstructionState, DelaunayTriangulation};
use crate::geometry::predicates::{point_segment_position, SegmentPosition};

/// Wires the vertex `vk` into the mesh.
///
/// Returns the seed triangle for the Delaunay restoration pass, or `None`
/// when the insertion stayed in (or merely extended) a bootstrap state.
pub(crate) fn insert_vertex(
    tri: &mut DelaunayTriangulation,
    vk: VertexKey,
) -> Result<Option<TriangleKey>, TopologyError> {
    match tri.state {
        ConstructionState::Meshed => {
            let start = tri.locate_start().ok_or(TopologyError::NoStartTriangle)?;
            let p = tri.point(vk)?;
            let hit = locate::walk_from(tri, start, &p)?;
            let seed = if tri.node(hit)?.is_halfplane() {
                extend_outside(tri, hit, vk)?
            } else {
                extend_inside(tri, hit, vk)?
            };
            Ok(Some(seed))
        }
        ConstructionState::Empty => {
            tri.state = ConstructionState::Buffered { first: vk };
            Ok(None)
        }
        ConstructionState::Buffered { first } => {
            start_segment(tri, first, vk)?;
            Ok(None)
        }
        ConstructionState::Collinear { .. } => classify_collinear(tri, vk),
    }
}

/// Builds the two-halfplane chain over the first two points.
fn start_segment(
    tri: &mut DelaunayTriangulation,
    first: VertexKey,
    second: VertexKey,
) -> Result<(), TopologyError> {
    let p1 = tri.point(first)?;
    let p2 = tri.point(second)?;
    let (small, big) = if p1.cmp_xy(&p2) == Ordering::Less {
        (first, second)
    } else {
        (second, first)
    };
    // The chain node runs big -> small; its twin covers the other side.
    let chain = tri.make_halfplane(big, small);
    let twin = tri.make_halfplane(small, big);
    {
        let node = tri.node_mut(chain)?;
        node.ab_next = Some(twin);
        node.bc_next = Some(twin);
        node.ca_next = Some(twin);
    }
    {
        let node = tri.node_mut(twin)?;
        node.ab_next = Some(chain);
        node.bc_next = Some(chain);
        node.ca_next = Some(chain);
    }
    tri.hull_start = Some(chain);
    tri.state = ConstructionState::Collinear {
        first_point: small,
        last_point: big,
        first_node: chain,
        last_node: chain,
    };
    Ok(())
}

/// Decides what a new point does to the collinear chain.
///
/// A point off the chain line promotes the whole chain into a triangle fan
/// and the mesh becomes `Meshed`; a point on the line is spliced into the
/// chain and the bootstrap continues.
fn classify_collinear(
    tri: &mut DelaunayTriangulation,
    vk: VertexKey,
) -> Result<Option<TriangleKey>, TopologyError> {
    let ConstructionState::Collinear {
        first_point,
        last_point,
        first_node,
        ..
    } = tri.state
    else {
        return Ok(None);
    };
    let pf = tri.point(first_point)?;
    let pl = tri.point(last_point)?;
    let p = tri.point(vk)?;
    match point_segment_position(&pf, &pl, &p) {
        SegmentPosition::Left => {
            // The twin faces the new point.
            let twin = tri
                .node(first_node)?
                .ab_next
                .ok_or(TopologyError::UnsetNeighbor(first_node))?;
            let seed = extend_outside(tri, twin, vk)?;
            tri.state = ConstructionState::Meshed;
            tri.start_triangle = Some(seed);
            Ok(None)
        }
        SegmentPosition::Right => {
            let seed = extend_outside(tri, first_node, vk)?;
            tri.state = ConstructionState::Meshed;
            tri.start_triangle = Some(seed);
            Ok(None)
        }
        position @ (SegmentPosition::OnSegment
        | SegmentPosition::InFrontOfA
        | SegmentPosition::BehindB) => {
            splice_collinear(tri, vk, position)?;
            Ok(None)
        }
        SegmentPosition::Degenerate => Ok(None),
    }
}

/// Splices a collinear point into the chain of halfplane pairs.
fn splice_collinear(
    tri: &mut DelaunayTriangulation,
    vk: VertexKey,
    position: SegmentPosition,
) -> Result<(), TopologyError> {
    let ConstructionState::Collinear {
        mut first_point,
        mut last_point,
        mut first_node,
        mut last_node,
    } = tri.state
    else {
        return Ok(());
    };

    match position {
        SegmentPosition::InFrontOfA => {
            // New smallest point: prepend a halfplane pair.
            let t = tri.make_halfplane(first_point, vk);
            let tp = tri.make_halfplane(vk, first_point);
            let first_ab = tri
                .node(first_node)?
                .ab_next
                .ok_or(TopologyError::UnsetNeighbor(first_node))?;
            tri.node_mut(t)?.ab_next = Some(tp);
            tri.node_mut(tp)?.ab_next = Some(t);
            tri.node_mut(t)?.bc_next = Some(tp);
            tri.node_mut(tp)?.ca_next = Some(t);
            tri.node_mut(t)?.ca_next = Some(first_node);
            tri.node_mut(first_node)?.bc_next = Some(t);
            tri.node_mut(tp)?.bc_next = Some(first_ab);
            tri.node_mut(first_ab)?.ca_next = Some(tp);
            first_node = t;
            first_point = vk;
        }
        SegmentPosition::BehindB => {
            // New largest point: append a halfplane pair.
            let t = tri.make_halfplane(vk, last_point);
            let tp = tri.make_halfplane(last_point, vk);
            let last_ab = tri
                .node(last_node)?
                .ab_next
                .ok_or(TopologyError::UnsetNeighbor(last_node))?;
            tri.node_mut(t)?.ab_next = Some(tp);
            tri.node_mut(tp)?.ab_next = Some(t);
            tri.node_mut(t)?.bc_next = Some(last_node);
            tri.node_mut(last_node)?.ca_next = Some(t);
            tri.node_mut(t)?.ca_next = Some(tp);
            tri.node_mut(tp)?.bc_next = Some(t);
            tri.node_mut(tp)?.ca_next = Some(last_ab);
            tri.node_mut(last_ab)?.bc_next = Some(tp);
            last_node = t;
            last_point = vk;
        }
        SegmentPosition::OnSegment => {
            // Find the chain segment covering the new point.
            let p = tri.point(vk)?;
            let mut u = first_node;
            let mut remaining = tri.triangles.len() + 1;
            loop {
                let ua = tri.node(u)?.a;
                if p.cmp_xy(&tri.point(ua)?) != Ordering::Greater {
                    break;
                }
                u = tri.node(u)?.ca_next.ok_or(TopologyError::UnsetNeighbor(u))?;
                remaining -= 1;
                if remaining == 0 {
                    return Err(TopologyError::WalkOverrun);
                }
            }
            let u_b = tri.node(u)?.b;
            let u_ab = tri.node(u)?.ab_next.ok_or(TopologyError::UnsetNeighbor(u))?;
            let u_bc = tri.node(u)?.bc_next.ok_or(TopologyError::UnsetNeighbor(u))?;
            let t = tri.make_halfplane(vk, u_b);
            let tp = tri.make_halfplane(u_b, vk);
            tri.node_mut(u)?.b = vk;
            tri.node_mut(u_ab)?.a = vk;
            tri.node_mut(t)?.ab_next = Some(tp);
            tri.node_mut(tp)?.ab_next = Some(t);
            tri.node_mut(t)?.bc_next = Some(u_bc);
            tri.node_mut(u_bc)?.ca_next = Some(t);
            tri.node_mut(t)?.ca_next = Some(u);
            tri.node_mut(u)?.bc_next = Some(t);
            let u_ab_ca = tri
                .node(u_ab)?
                .ca_next
                .ok_or(TopologyError::UnsetNeighbor(u_ab))?;
            tri.node_mut(tp)?.ca_next = Some(u_ab_ca);
            tri.node_mut(u_ab_ca)?.bc_next = Some(tp);
            tri.node_mut(tp)?.bc_next = Some(u_ab);
            tri.node_mut(u_ab)?.ca_next = Some(tp);
            if first_node == u {
                first_node = t;
            }
        }
        _ => {}
    }

    tri.state = ConstructionState::Collinear {
        first_point,
        last_point,
        first_node,
        last_node,
    };
    Ok(())
}

/// Splits the filled triangle `t_key` in three around the interior point.
///
/// The hit triangle keeps its `ab` edge and gains the new vertex as third
/// corner; two fresh triangles take over the `bc` and `ca` sides. A point
/// falling exactly on a hull edge of the hit triangle is rerouted through the
/// adjacent halfplane instead.
pub(crate) fn extend_inside(
    tri: &mut DelaunayTriangulation,
    t_key: TriangleKey,
    vk: VertexKey,
) -> Result<TriangleKey, TopologyError> {
    if let Some(seed) = treat_edge_degeneracy(tri, t_key, vk)? {
        return Ok(seed);
    }
    let node = *tri.node(t_key)?;
    let c = node.c.ok_or(TopologyError::ExpectedFilled(t_key))?;
    let (t_bc, t_ca) = (node.bc_next, node.ca_next);
    let h1 = tri.make_filled(c, node.a, vk)?;
    let h2 = tri.make_filled(node.b, c, vk)?;
    let generation = tri.update_counter;
    {
        let t = tri.node_mut(t_key)?;
        t.c = Some(vk);
        t.generation = generation;
    }
    tri.recompute_circumcircle(t_key)?;
    {
        let n = tri.node_mut(h1)?;
        n.ab_next = t_ca;
        n.bc_next = Some(t_key);
        n.ca_next = Some(h2);
    }
    {
        let n = tri.node_mut(h2)?;
        n.ab_next = t_bc;
        n.bc_next = Some(h1);
        n.ca_next = Some(t_key);
    }
    tri.switch_neighbors(t_ca, t_key, h1)?;
    tri.switch_neighbors(t_bc, t_key, h2)?;
    {
        let t = tri.node_mut(t_key)?;
        t.bc_next = Some(h2);
        t.ca_next = Some(h1);
    }
    Ok(t_key)
}

/// Reroutes an interior hit that actually lies on a hull edge.
///
/// The locate walk can land in a filled triangle whose hull-facing edge
/// carries the point; splitting that triangle in three would create a zero
/// area sliver against the hull, so the insertion goes through the adjacent
/// halfplane instead.
fn treat_edge_degeneracy(
    tri: &mut DelaunayTriangulation,
    t_key: TriangleKey,
    vk: VertexKey,
) -> Result<Option<TriangleKey>, TopologyError> {
    let node = *tri.node(t_key)?;
    let c = node.c.ok_or(TopologyError::ExpectedFilled(t_key))?;
    let p = tri.point(vk)?;
    // Edges reversed: seen from the halfplane side.
    let sides = [
        (node.ab_next, node.b, node.a),
        (node.bc_next, c, node.b),
        (node.ca_next, node.a, c),
    ];
    for (neighbor, from, to) in sides {
        let hp = neighbor.ok_or(TopologyError::UnsetNeighbor(t_key))?;
        if !tri.node(hp)?.is_halfplane() {
            continue;
        }
        let pf = tri.point(from)?;
        let pt = tri.point(to)?;
        if point_segment_position(&pf, &pt, &p) == SegmentPosition::OnSegment {
            return extend_outside(tri, hp, vk).map(Some);
        }
    }
    Ok(None)
}

/// Extends the mesh over an exterior point seen from the halfplane `t_key`.
pub(crate) fn extend_outside(
    tri: &mut DelaunayTriangulation,
    t_key: TriangleKey,
    vk: VertexKey,
) -> Result<TriangleKey, TopologyError> {
    let node = *tri.node(t_key)?;
    let pa = tri.point(node.a)?;
    let pb = tri.point(node.b)?;
    let p = tri.point(vk)?;
    if point_segment_position(&pa, &pb, &p) == SegmentPosition::OnSegment {
        return subdivide_hull_edge(tri, t_key, vk);
    }
    let ccw_cap = extend_ccw(tri, t_key, vk)?;
    let cw_cap = extend_cw(tri, t_key, vk)?;
    tri.node_mut(ccw_cap)?.bc_next = Some(cw_cap);
    tri.node_mut(cw_cap)?.ca_next = Some(ccw_cap);
    tri.hull_start = Some(cw_cap);
    tri.node(cw_cap)?
        .ab_next
        .ok_or(TopologyError::UnsetNeighbor(cw_cap))
}

/// Splits the hull edge of halfplane `t_key` at a point lying exactly on it.
///
/// Produces a zero-area filled triangle over the split edge; the restoration
/// pass dissolves it immediately through its infinite circumcircle.
fn subdivide_hull_edge(
    tri: &mut DelaunayTriangulation,
    t_key: TriangleKey,
    vk: VertexKey,
) -> Result<TriangleKey, TopologyError> {
    let node = *tri.node(t_key)?;
    let t_ab = node.ab_next.ok_or(TopologyError::UnsetNeighbor(t_key))?;
    let t_bc = node.bc_next.ok_or(TopologyError::UnsetNeighbor(t_key))?;
    let dg = tri.make_filled(node.a, node.b, vk)?;
    let hp = tri.make_halfplane(vk, node.b);
    tri.node_mut(t_key)?.b = vk;
    tri.node_mut(dg)?.ab_next = Some(t_ab);
    tri.switch_neighbors(Some(t_ab), t_key, dg)?;
    tri.node_mut(dg)?.bc_next = Some(hp);
    tri.node_mut(hp)?.ab_next = Some(dg);
    tri.node_mut(dg)?.ca_next = Some(t_key);
    tri.node_mut(t_key)?.ab_next = Some(dg);
    tri.node_mut(hp)?.bc_next = Some(t_bc);
    tri.node_mut(t_bc)?.ca_next = Some(hp);
    tri.node_mut(hp)?.ca_next = Some(t_key);
    tri.node_mut(t_key)?.bc_next = Some(hp);
    Ok(dg)
}

/// Swallows hull halfplanes counter-clockwise while they see the point.
///
/// Each visible halfplane becomes a filled triangle with the new vertex as
/// third corner; the walk stops at the first hull edge the point cannot see
/// and caps the fan with a fresh halfplane there.
fn extend_ccw(
    tri: &mut DelaunayTriangulation,
    mut t_key: TriangleKey,
    vk: VertexKey,
) -> Result<TriangleKey, TopologyError> {
    let p = tri.point(vk)?;
    let mut remaining = tri.triangles.len() + 1;
    loop {
        if remaining == 0 {
            return Err(TopologyError::WalkOverrun);
        }
        remaining -= 1;
        tri.promote(t_key, vk)?;
        let prev = tri
            .node(t_key)?
            .ca_next
            .ok_or(TopologyError::UnsetNeighbor(t_key))?;
        let prev_node = *tri.node(prev)?;
        let pa = tri.point(prev_node.a)?;
        let pb = tri.point(prev_node.b)?;
        match point_segment_position(&pa, &pb, &p) {
            SegmentPosition::OnSegment | SegmentPosition::Left => {
                t_key = prev;
            }
            SegmentPosition::Right
            | SegmentPosition::InFrontOfA
            | SegmentPosition::BehindB
            | SegmentPosition::Degenerate => {
                let ta = tri.node(t_key)?.a;
                let cap = tri.make_halfplane(ta, vk);
                tri.node_mut(cap)?.ab_next = Some(t_key);
                tri.node_mut(t_key)?.ca_next = Some(cap);
                tri.node_mut(cap)?.ca_next = Some(prev);
                tri.node_mut(prev)?.bc_next = Some(cap);
                return Ok(cap);
            }
        }
    }
}

/// Clockwise mirror of [`extend_ccw`].
fn extend_cw(
    tri: &mut DelaunayTriangulation,
    mut t_key: TriangleKey,
    vk: VertexKey,
) -> Result<TriangleKey, TopologyError> {
    let p = tri.point(vk)?;
    let mut remaining = tri.triangles.len() + 1;
    loop {
        if remaining == 0 {
            return Err(TopologyError::WalkOverrun);
        }
        remaining -= 1;
        tri.promote(t_key, vk)?;
        let next = tri
            .node(t_key)?
            .bc_next
            .ok_or(TopologyError::UnsetNeighbor(t_key))?;
        let next_node = *tri.node(next)?;
        let pa = tri.point(next_node.a)?;
        let pb = tri.point(next_node.b)?;
        match point_segment_position(&pa, &pb, &p) {
            SegmentPosition::OnSegment | SegmentPosition::Left => {
                t_key = next;
            }
            SegmentPosition::Right
            | SegmentPosition::InFrontOfA
            | SegmentPosition::BehindB
            | SegmentPosition::Degenerate => {
                let tb = tri.node(t_key)?.b;
                let cap = tri.make_halfplane(vk, tb);
                tri.node_mut(cap)?.ab_next = Some(t_key);
                tri.node_mut(t_key)?.bc_next = Some(cap);
                tri.node_mut(cap)?.bc_next = Some(next);
                tri.node_mut(next)?.ca_next = Some(cap);
                return Ok(cap);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point;

    #[test]
    fn bootstrap_states_progress() {
        let mut tin = DelaunayTriangulation::new();
        assert_eq!(*tin.state(), ConstructionState::Empty);
        tin.insert(point!(0.0, 0.0)).unwrap();
        assert!(matches!(tin.state(), ConstructionState::Buffered { .. }));
        tin.insert(point!(2.0, 0.0)).unwrap();
        assert!(matches!(tin.state(), ConstructionState::Collinear { .. }));
        tin.insert(point!(1.0, 0.0)).unwrap();
        assert!(matches!(tin.state(), ConstructionState::Collinear { .. }));
        assert_eq!(tin.number_of_triangles(), 0);
        tin.insert(point!(1.0, 1.0)).unwrap();
        assert_eq!(*tin.state(), ConstructionState::Meshed);
        assert_eq!(tin.number_of_triangles(), 2);
    }

    #[test]
    fn collinear_chain_accepts_points_in_any_order() {
        // Prepend, append and middle splice before promotion.
        let mut tin = DelaunayTriangulation::new();
        for x in [3.0, 5.0, 1.0, 9.0, 4.0] {
            tin.insert(point!(x, 0.0)).unwrap();
        }
        assert!(matches!(tin.state(), ConstructionState::Collinear { .. }));
        tin.insert(point!(4.0, 2.0)).unwrap();
        assert_eq!(*tin.state(), ConstructionState::Meshed);
        // The fan covers every chain segment: one triangle per segment.
        assert_eq!(tin.number_of_triangles(), 4);
        assert_eq!(tin.number_of_vertices(), 6);
    }

    #[test]
    fn promotion_from_either_side() {
        for y in [1.0, -1.0] {
            let mut tin = DelaunayTriangulation::new();
            for x in [0.0, 1.0, 2.0] {
                tin.insert(point!(x, 0.0)).unwrap();
            }
            tin.insert(point!(1.0, y)).unwrap();
            assert_eq!(*tin.state(), ConstructionState::Meshed);
            assert_eq!(tin.number_of_triangles(), 2);
            assert!(tin.contains(&point!(1.0, y / 2.0)));
        }
    }

    #[test]
    fn exterior_point_extends_hull() {
        let mut tin = DelaunayTriangulation::new();
        for p in [point!(0.0, 0.0), point!(4.0, 0.0), point!(2.0, 3.0)] {
            tin.insert(p).unwrap();
        }
        assert_eq!(tin.convex_hull_size(), 3);
        tin.insert(point!(2.0, -3.0)).unwrap();
        assert_eq!(tin.number_of_triangles(), 2);
        assert_eq!(tin.convex_hull_size(), 4);
        // A point swallowing two hull edges at once.
        tin.insert(point!(10.0, 0.0)).unwrap();
        assert!(tin.contains(&point!(3.0, 0.5)));
    }

    #[test]
    fn point_on_hull_edge_splits_it() {
        let mut tin = DelaunayTriangulation::new();
        for p in [point!(0.0, 0.0), point!(4.0, 0.0), point!(2.0, 3.0)] {
            tin.insert(p).unwrap();
        }
        tin.insert(point!(2.0, 0.0)).unwrap();
        assert_eq!(tin.number_of_vertices(), 4);
        assert_eq!(tin.number_of_triangles(), 2);
        assert!(tin.contains(&point!(2.0, 0.0)));
        assert_eq!(tin.convex_hull_size(), 4);
    }

    #[test]
    fn interior_point_splits_in_three() {
        let mut tin = DelaunayTriangulation::new();
        for p in [point!(0.0, 0.0), point!(6.0, 0.0), point!(3.0, 6.0)] {
            tin.insert(p).unwrap();
        }
        tin.insert(point!(3.0, 2.0)).unwrap();
        assert_eq!(tin.number_of_triangles(), 3);
        assert_eq!(tin.convex_hull_size(), 3);
    }
}
