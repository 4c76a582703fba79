//! Delaunay restoration by local edge flips.
//!
//! After a vertex is wired in, every triangle of its fan is checked against
//! the neighbor across its outer edge: if that neighbor's circumcircle
//! contains the fan apex, the shared edge is flipped and the two resulting
//! triangles are re-checked. The pass is driven by an explicit worklist, and
//! a per-insertion set of created diagonals bounds it: a diagonal is never
//! created twice within one restoration, so the cascade terminates even on
//! degenerate (cocircular) input.

use smallvec::smallvec;

use crate::core::collections::{FastHashSet, SmallBuffer};
use crate::core::errors::TopologyError;
use crate::core::triangle::{TriangleKey, VertexKey};
use crate::core::triangulation::DelaunayTriangulation;

/// Restores the Delaunay property around the fan rooted at `fan`.
///
/// `fan` is the seed triangle returned by the insertion step; the fan
/// members are reached by walking `ca_next` around the new vertex. Every
/// triangle touched is stamped with `generation`.
pub(crate) fn restore_delaunay(
    tri: &mut DelaunayTriangulation,
    fan: TriangleKey,
    generation: u64,
) -> Result<(), TopologyError> {
    let mut flipped: FastHashSet<(VertexKey, VertexKey)> = FastHashSet::default();
    let mut current = fan;
    loop {
        flip_cascade(tri, current, generation, &mut flipped)?;
        let next = tri
            .node(current)?
            .ca_next
            .ok_or(TopologyError::UnsetNeighbor(current))?;
        if next == fan || tri.node(next)?.is_halfplane() {
            return Ok(());
        }
        current = next;
    }
}

/// Flips edges outward from `seed` until the local mesh is Delaunay.
fn flip_cascade(
    tri: &mut DelaunayTriangulation,
    seed: TriangleKey,
    generation: u64,
    flipped: &mut FastHashSet<(VertexKey, VertexKey)>,
) -> Result<(), TopologyError> {
    let mut work: SmallBuffer<TriangleKey, 16> = smallvec![seed];
    while let Some(t_key) = work.pop() {
        // Flipped-away triangles may still sit in the worklist.
        if !tri.triangles.contains_key(t_key) {
            continue;
        }
        tri.node_mut(t_key)?.generation = generation;
        let t = *tri.node(t_key)?;
        let Some(tc) = t.c else {
            continue;
        };
        let u_key = t.ab_next.ok_or(TopologyError::UnsetNeighbor(t_key))?;
        let u = *tri.node(u_key)?;
        if u.is_halfplane() {
            continue;
        }
        let apex = tri.point(tc)?;
        if !u.circumcircle.is_some_and(|circle| circle.contains(&apex)) {
            continue;
        }

        // The quad is t.a, opp, t.b, t.c; the flip replaces the shared edge
        // t.a -> t.b by the diagonal t.c -> opp.
        let uc = u.c.ok_or(TopologyError::ExpectedFilled(u_key))?;
        let (opp, v_ab, new_t_ab) = if t.a == u.a {
            (u.b, u.bc_next, u.ab_next)
        } else if t.a == u.b {
            (uc, u.ca_next, u.bc_next)
        } else if t.a == uc {
            (u.a, u.ab_next, u.ca_next)
        } else {
            return Err(TopologyError::FlipMismatch);
        };
        let diagonal = if tc < opp { (tc, opp) } else { (opp, tc) };
        if !flipped.insert(diagonal) {
            continue;
        }

        let v_key = tri.make_filled(opp, t.b, tc)?;
        {
            let v = tri.node_mut(v_key)?;
            v.ab_next = v_ab;
            v.bc_next = t.bc_next;
            v.generation = generation;
        }
        tri.switch_neighbors(v_ab, u_key, v_key)?;
        tri.switch_neighbors(t.bc_next, t_key, v_key)?;
        {
            let node = tri.node_mut(t_key)?;
            node.bc_next = Some(v_key);
            node.b = opp;
            node.ab_next = new_t_ab;
        }
        tri.node_mut(v_key)?.ca_next = Some(t_key);
        tri.switch_neighbors(new_t_ab, u_key, t_key)?;
        tri.recompute_circumcircle(t_key)?;
        tri.triangles.remove(u_key);
        work.push(t_key);
        work.push(v_key);
    }
    Ok(())
}
