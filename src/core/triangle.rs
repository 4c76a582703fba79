//! Mesh node type: filled triangles and hull halfplanes.

use slotmap::new_key_type;

use crate::geometry::predicates::Circumcircle;

new_key_type! {
    /// Arena key addressing a mesh node (filled triangle or halfplane).
    pub struct TriangleKey;
}

new_key_type! {
    /// Arena key addressing an inserted point.
    pub struct VertexKey;
}

/// The corner slots of a mesh node, used to name edges and neighbors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    /// First corner slot.
    A,
    /// Second corner slot.
    B,
    /// Third corner slot (absent on halfplanes).
    C,
}

/// One node of the mesh: either a filled triangle or a hull halfplane.
///
/// A filled node has three corners `a`, `b`, `c` in counter-clockwise order
/// and three neighbors, one across each directed edge. A halfplane is the
/// unbounded region left of the directed hull edge `a -> b`; its `c` slot is
/// `None` and its neighbor slots are reused as hull links: `ab_next` is the
/// filled triangle inside the hull, `ca_next` the previous halfplane
/// (counter-clockwise) and `bc_next` the next one (clockwise).
///
/// Neighbor slots are `Option` only while a node is under construction;
/// every slot is linked before an insertion returns.
#[derive(Clone, Copy, Debug)]
pub struct TriangleNode {
    /// First corner.
    pub a: VertexKey,
    /// Second corner.
    pub b: VertexKey,
    /// Third corner; `None` marks a halfplane.
    pub c: Option<VertexKey>,
    /// Neighbor across the edge `a -> b`.
    pub ab_next: Option<TriangleKey>,
    /// Neighbor across the edge `b -> c`.
    pub bc_next: Option<TriangleKey>,
    /// Neighbor across the edge `c -> a`.
    pub ca_next: Option<TriangleKey>,
    /// Cached circumcircle; `None` on halfplanes.
    pub circumcircle: Option<Circumcircle>,
    /// Insertion counter value of the last mutation touching this node.
    pub generation: u64,
}

impl TriangleNode {
    /// A filled triangle with corners `a`, `b`, `c` and no links yet.
    #[must_use]
    pub const fn filled(a: VertexKey, b: VertexKey, c: VertexKey, generation: u64) -> Self {
        Self {
            a,
            b,
            c: Some(c),
            ab_next: None,
            bc_next: None,
            ca_next: None,
            circumcircle: None,
            generation,
        }
    }

    /// A halfplane left of the directed hull edge `a -> b`, no links yet.
    #[must_use]
    pub const fn halfplane(a: VertexKey, b: VertexKey, generation: u64) -> Self {
        Self {
            a,
            b,
            c: None,
            ab_next: None,
            bc_next: None,
            ca_next: None,
            circumcircle: None,
            generation,
        }
    }

    /// Returns `true` if this node is an unbounded hull halfplane.
    #[inline]
    #[must_use]
    pub const fn is_halfplane(&self) -> bool {
        self.c.is_none()
    }

    /// Which corner slot holds `vertex`, if any.
    #[must_use]
    pub fn corner_of(&self, vertex: VertexKey) -> Option<Corner> {
        if self.a == vertex {
            Some(Corner::A)
        } else if self.b == vertex {
            Some(Corner::B)
        } else if self.c == Some(vertex) {
            Some(Corner::C)
        } else {
            None
        }
    }

    /// Replaces the neighbor slot currently holding `old` with `new`.
    ///
    /// Returns `false` when no slot held `old`, which callers treat as a
    /// topology corruption.
    pub fn switch_neighbor(&mut self, old: TriangleKey, new: TriangleKey) -> bool {
        if self.ab_next == Some(old) {
            self.ab_next = Some(new);
            true
        } else if self.bc_next == Some(old) {
            self.bc_next = Some(new);
            true
        } else if self.ca_next == Some(old) {
            self.ca_next = Some(new);
            true
        } else {
            false
        }
    }

    /// The three neighbor slots in edge order `ab`, `bc`, `ca`.
    #[must_use]
    pub const fn neighbors(&self) -> [Option<TriangleKey>; 3] {
        [self.ab_next, self.bc_next, self.ca_next]
    }
}
