//! Bounded recency list for ghost entries.
//!
//! Used by the adaptive (ARC) policy to track recently evicted keys without
//! storing values. Implemented as a slot-vector doubly linked list plus a
//! hash index for O(1) lookups.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                         GhostList Layout                           │
//! │                                                                    │
//! │   ┌───────────────────────────┐   ┌─────────────────────────────┐  │
//! │   │  index: FxHashMap<K, ix>  │   │  slots: Vec<Slot<K>>        │  │
//! │   │                           │   │                             │  │
//! │   │  ┌─────────┬──────────┐   │   │  head ─► [A] ◄─► [B] ◄─► [C]│  │
//! │   │  │   Key   │   slot   │   │   │          MRU          oldest│  │
//! │   │  ├─────────┼──────────┤   │   │                        ▲    │  │
//! │   │  │  "a"    │    0     │───┼───┼────────► [A]           │    │  │
//! │   │  │  "b"    │    1     │───┼───┼────────► [B]           │    │  │
//! │   │  │  "c"    │    2     │───┼───┼────────► [C] ◄── tail ─┘    │  │
//! │   │  └─────────┴──────────┘   │   └─────────────────────────────┘  │
//! │   └───────────────────────────┘                                    │
//! │                                                                    │
//! │   record("d") when full: drop oldest ("c"), insert "d" at MRU      │
//! │   record("a") when present: move "a" to MRU, no eviction           │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation    | Description                             | Complexity |
//! |--------------|-----------------------------------------|------------|
//! | `record`     | Add/promote key to MRU, drop oldest     | O(1) avg   |
//! | `remove`     | Erase a tracked key                     | O(1) avg   |
//! | `contains`   | Check whether a key is tracked          | O(1) avg   |
//! | `pop_oldest` | Remove and return the oldest key        | O(1) avg   |
//!
//! A ghost hit (accessing a key found here) tells an adaptive policy that it
//! recently evicted something it should have kept; the ARC engine shifts one
//! unit of capacity toward the part whose ghost was touched.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::ds::GhostList;
//!
//! let mut ghost = GhostList::new(3);
//! ghost.record("a");
//! ghost.record("b");
//! ghost.record("c");
//!
//! // At capacity, the oldest entry is dropped
//! ghost.record("d");
//! assert!(!ghost.contains(&"a"));
//! assert!(ghost.contains(&"d"));
//!
//! // A hit is consumed by removal
//! assert!(ghost.remove(&"b"));
//! assert!(!ghost.contains(&"b"));
//! ```
//!
//! ## Thread Safety
//!
//! `GhostList` is not thread-safe; the owning engine's lock covers it.

use rustc_hash::FxHashMap;
use std::hash::Hash;

#[derive(Debug)]
struct Slot<K> {
    key: Option<K>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Bounded recency list of keys (no values) for ARC-style ghost tracking.
///
/// A capacity of 0 creates a no-op list that ignores all records.
#[derive(Debug)]
pub struct GhostList<K> {
    slots: Vec<Slot<K>>,
    free: Vec<usize>,
    index: FxHashMap<K, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
}

impl<K> GhostList<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a new ghost list holding at most `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            head: None,
            tail: None,
            capacity,
        }
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if `key` is currently tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Records `key` at the most-recent position.
    ///
    /// If the key is already tracked it is promoted to MRU. Otherwise it is
    /// inserted, dropping the oldest tracked key first when the list is at
    /// capacity.
    pub fn record(&mut self, key: K) {
        if self.capacity == 0 {
            return;
        }

        if let Some(&idx) = self.index.get(&key) {
            self.detach(idx);
            self.attach_front(idx);
            return;
        }

        if self.index.len() >= self.capacity {
            self.pop_oldest();
        }

        let idx = self.allocate(key.clone());
        self.attach_front(idx);
        self.index.insert(key, idx);
    }

    /// Removes `key` from the list. Returns `true` if it was tracked.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(idx) => {
                self.detach(idx);
                self.release(idx);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the oldest tracked key.
    pub fn pop_oldest(&mut self) -> Option<K> {
        let idx = self.tail?;
        self.detach(idx);
        let key = self.release(idx)?;
        self.index.remove(&key);
        Some(key)
    }

    /// Iterates over the tracked keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.index.keys()
    }

    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    fn allocate(&mut self, key: K) -> usize {
        let slot = Slot {
            key: Some(key),
            prev: None,
            next: None,
        };
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = slot;
            idx
        } else {
            self.slots.push(slot);
            self.slots.len() - 1
        }
    }

    fn release(&mut self, idx: usize) -> Option<K> {
        let key = self.slots[idx].key.take();
        self.slots[idx].prev = None;
        self.slots[idx].next = None;
        self.free.push(idx);
        key
    }

    fn detach(&mut self, idx: usize) {
        let prev = self.slots[idx].prev;
        let next = self.slots[idx].next;

        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }

        self.slots[idx].prev = None;
        self.slots[idx].next = None;
    }

    fn attach_front(&mut self, idx: usize) {
        self.slots[idx].prev = None;
        self.slots[idx].next = self.head;

        match self.head {
            Some(h) => self.slots[h].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    /// Validates list/index consistency. Test and debug builds only.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.index.len() <= self.capacity);

        let mut count = 0usize;
        let mut last = None;
        let mut current = self.head;
        while let Some(idx) = current {
            let slot = &self.slots[idx];
            let key = slot.key.as_ref().expect("linked slot without key");
            assert_eq!(self.index.get(key), Some(&idx));
            assert_eq!(slot.prev, last);
            last = Some(idx);
            current = slot.next;
            count += 1;
            assert!(count <= self.slots.len(), "cycle detected in ghost list");
        }
        assert_eq!(self.tail, last);
        assert_eq!(count, self.index.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn record_and_contains() {
        let mut ghost = GhostList::new(4);
        ghost.record(1u32);
        ghost.record(2);
        assert!(ghost.contains(&1));
        assert!(ghost.contains(&2));
        assert!(!ghost.contains(&3));
        assert_eq!(ghost.len(), 2);
    }

    #[test]
    fn overflow_drops_oldest_first() {
        let mut ghost = GhostList::new(3);
        for k in 1u32..=3 {
            ghost.record(k);
        }
        ghost.record(4);
        assert!(!ghost.contains(&1));
        assert!(ghost.contains(&2));
        assert!(ghost.contains(&4));
        assert_eq!(ghost.len(), 3);
    }

    #[test]
    fn re_record_promotes_to_mru() {
        let mut ghost = GhostList::new(3);
        ghost.record("a");
        ghost.record("b");
        ghost.record("c");
        ghost.record("a");
        ghost.record("d");
        // "b" was oldest after the promotion of "a"
        assert!(!ghost.contains(&"b"));
        assert!(ghost.contains(&"a"));
        assert!(ghost.contains(&"c"));
        assert!(ghost.contains(&"d"));
    }

    #[test]
    fn remove_untracks_key() {
        let mut ghost = GhostList::new(3);
        ghost.record(1u32);
        assert!(ghost.remove(&1));
        assert!(!ghost.remove(&1));
        assert!(ghost.is_empty());
    }

    #[test]
    fn pop_oldest_returns_fifo_order() {
        let mut ghost = GhostList::new(3);
        ghost.record(1u32);
        ghost.record(2);
        ghost.record(3);
        assert_eq!(ghost.pop_oldest(), Some(1));
        assert_eq!(ghost.pop_oldest(), Some(2));
        assert_eq!(ghost.pop_oldest(), Some(3));
        assert_eq!(ghost.pop_oldest(), None);
    }

    #[test]
    fn zero_capacity_ignores_records() {
        let mut ghost = GhostList::new(0);
        ghost.record(1u32);
        assert!(ghost.is_empty());
        assert!(!ghost.contains(&1));
    }

    #[test]
    fn clear_resets_state() {
        let mut ghost = GhostList::new(3);
        ghost.record(1u32);
        ghost.record(2);
        ghost.clear();
        assert!(ghost.is_empty());
        ghost.record(3);
        assert!(ghost.contains(&3));
        ghost.debug_validate_invariants();
    }

    proptest! {
        /// Invariants hold after any sequence of operations.
        #[test]
        fn prop_invariants_always_hold(
            capacity in 1usize..20,
            ops in prop::collection::vec((0u8..3, any::<u32>()), 0..60)
        ) {
            let mut ghost: GhostList<u32> = GhostList::new(capacity);

            for (op, key) in ops {
                match op % 3 {
                    0 => ghost.record(key),
                    1 => { ghost.remove(&key); }
                    2 => { let _ = ghost.contains(&key); }
                    _ => unreachable!(),
                }
                ghost.debug_validate_invariants();
                prop_assert!(ghost.len() <= capacity);
            }
        }

        /// Oldest keys are evicted first.
        #[test]
        fn prop_fifo_eviction_order(
            capacity in 2usize..10,
            keys in prop::collection::vec(0u32..50, 1..30)
        ) {
            let mut ghost: GhostList<u32> = GhostList::new(capacity);
            let mut model: Vec<u32> = Vec::new();

            for &key in &keys {
                if let Some(pos) = model.iter().position(|&k| k == key) {
                    model.remove(pos);
                } else if model.len() == capacity {
                    model.remove(0);
                }
                model.push(key);
                ghost.record(key);
            }

            for key in &model {
                prop_assert!(ghost.contains(key));
            }
            prop_assert_eq!(ghost.len(), model.len());
        }
    }
}
