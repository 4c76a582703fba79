//! Collection type aliases used across the crate.
//!
//! Centralizing the aliases keeps the choice of hasher and arena in one place:
//! the mesh never needs DoS-resistant hashing of its own keys, so the fast
//! `rustc-hash` hasher is used everywhere, and per-operation scratch buffers
//! use `smallvec` to stay off the heap in the common case.

use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use smallvec::SmallVec;

/// Fast hash set for internal keys (not DoS-resistant).
pub type FastHashSet<T> = FxHashSet<T>;

/// Arena storage for mesh entities addressed by generational keys.
pub type StorageMap<K, V> = SlotMap<K, V>;

/// Small inline buffer for per-operation scratch space.
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Builds an empty [`FastHashSet`] with room for `capacity` entries.
#[must_use]
pub fn fast_hash_set_with_capacity<T>(capacity: usize) -> FastHashSet<T> {
    FastHashSet::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}
