//! # Adaptive Replacement Cache (ARC) Engine
//!
//! Two cooperating sub-caches, a recency-biased part and a
//! frequency-biased part, each shadowed by a ghost list of recently evicted
//! keys. A hit on a ghost entry means "we evicted this key too early, our
//! split is wrong in that direction": one unit of capacity shifts to the
//! part whose ghost was touched. Over time the split converges on the
//! workload's ideal recency/frequency mix with no manual tuning.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │                         ArcCache<K, V>                            │
//!   │                                                                   │
//!   │   ┌──────────────────────────┐    ┌──────────────────────────┐    │
//!   │   │ Mutex<RecencyPart>       │    │ Mutex<FrequencyPart>     │    │
//!   │   │                          │    │                          │    │
//!   │   │  main: LRU list (c_r)    │    │  main: freq buckets (c_f)│    │
//!   │   │  access counts, T        │    │  min_freq tracking       │    │
//!   │   │  ghost: GhostList (g_r)  │    │  ghost: GhostList (g_f)  │    │
//!   │   └──────────────────────────┘    └──────────────────────────┘    │
//!   │                                                                   │
//!   │   ghost hit (recency side):  c_r += 1, c_f -= 1                   │
//!   │   ghost hit (frequency side): c_f += 1, c_r -= 1                  │
//!   │   count in recency part reaches T: copy into frequency part       │
//!   └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Initially `c_r = c_f = capacity` and `g_r = g_f = capacity`. A
//! `decrease_capacity` on a part that is already at zero refuses, which
//! cancels the complementary increase, so neither share goes negative and the
//! total is conserved.
//!
//! ## Locking
//!
//! Each part holds its own mutex. ARC-level operations acquire both in the
//! fixed order recency-then-frequency, so ghost-membership checks and
//! capacity adjustments are serialized and deadlock-free.
//!
//! ## Invariants
//!
//! - The two ghost lists and the union of the two main caches are pairwise
//!   disjoint on keys. Promotion copies a key into the frequency part while
//!   it remains in the recency list, so a later eviction of that key skips
//!   the ghost record (the key is still resident, not a misprediction).
//! - Each part's main size never exceeds its current capacity share.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::arc::ArcCache;
//! use evictkit::traits::CachePolicy;
//!
//! let cache = ArcCache::new(4);
//! cache.put("a", 1);
//!
//! // Second access crosses the default threshold (2): "a" is copied into
//! // the frequency part and survives recency churn.
//! assert_eq!(cache.get(&"a"), Some(1));
//! assert_eq!(cache.get(&"a"), Some(1));
//! ```
//!
//! ## References
//!
//! - Megiddo & Modha, "ARC: A Self-Tuning, Low Overhead Replacement Cache",
//!   FAST 2003

use std::fmt;
use std::hash::Hash;
use std::ptr::NonNull;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::collections::VecDeque;

use crate::ds::GhostList;
use crate::error::CacheError;
use crate::traits::{CachePolicy, ConcurrentCache};

/// Promotion threshold used by [`ArcCache::new`].
pub const DEFAULT_TRANSFORM_THRESHOLD: u64 = 2;

/// Which ghost list a key was found in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum GhostHit {
    Recency,
    Frequency,
}

/// Outcome of asking a part to give up one unit of capacity.
enum Shrink<K> {
    /// The part is already at zero capacity; the shift is cancelled.
    Refused,
    /// Capacity went down by one, evicting the contained key if the part
    /// was full. The caller decides whether the victim becomes a ghost.
    Shrunk(Option<K>),
}

// ---------------------------------------------------------------------------
// Recency part
// ---------------------------------------------------------------------------

#[repr(C)]
struct Node<K, V> {
    prev: Option<NonNull<Node<K, V>>>,
    next: Option<NonNull<Node<K, V>>>,
    key: K,
    value: V,
    access_count: u64,
}

/// LRU-ordered main list with per-node access counts and a ghost list.
struct RecencyPart<K, V>
where
    K: Eq + Hash + Clone,
{
    capacity: usize,
    threshold: u64,
    map: FxHashMap<K, NonNull<Node<K, V>>>,
    head: Option<NonNull<Node<K, V>>>,
    tail: Option<NonNull<Node<K, V>>>,
    ghost: GhostList<K>,
}

// SAFETY: the raw pointers only reference heap nodes owned by this struct.
unsafe impl<K, V> Send for RecencyPart<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send,
{
}

impl<K, V> RecencyPart<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(capacity: usize, threshold: u64) -> Self {
        Self {
            capacity,
            threshold,
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            head: None,
            tail: None,
            ghost: GhostList::new(capacity),
        }
    }

    #[inline(always)]
    fn detach(&mut self, node_ptr: NonNull<Node<K, V>>) {
        unsafe {
            let node = node_ptr.as_ref();
            let prev = node.prev;
            let next = node.next;

            match prev {
                Some(mut p) => p.as_mut().next = next,
                None => self.head = next,
            }
            match next {
                Some(mut n) => n.as_mut().prev = prev,
                None => self.tail = prev,
            }
        }
    }

    #[inline(always)]
    fn attach_front(&mut self, mut node_ptr: NonNull<Node<K, V>>) {
        unsafe {
            let node = node_ptr.as_mut();
            node.prev = None;
            node.next = self.head;

            match self.head {
                Some(mut h) => h.as_mut().prev = Some(node_ptr),
                None => self.tail = Some(node_ptr),
            }
            self.head = Some(node_ptr);
        }
    }

    /// Unlink the LRU node and hand its key back for the ghost decision.
    fn evict_least_recent(&mut self) -> Option<K> {
        let tail_ptr = self.tail?;
        self.detach(tail_ptr);
        let node = unsafe { Box::from_raw(tail_ptr.as_ptr()) };
        self.map.remove(&node.key);
        Some(node.key)
    }

    /// Hit path: move to MRU, bump the access count, report whether the
    /// promotion threshold has been reached.
    fn get(&mut self, key: &K) -> Option<(V, bool)>
    where
        V: Clone,
    {
        let node_ptr = *self.map.get(key)?;
        self.detach(node_ptr);
        self.attach_front(node_ptr);
        unsafe {
            let node = &mut *node_ptr.as_ptr();
            node.access_count += 1;
            Some((node.value.clone(), node.access_count >= self.threshold))
        }
    }

    /// Overwrite a resident entry (counts as an access). Returns the
    /// transform flag, or `None` when the key is not resident.
    fn update(&mut self, key: &K, value: V) -> Option<bool> {
        let node_ptr = *self.map.get(key)?;
        self.detach(node_ptr);
        self.attach_front(node_ptr);
        unsafe {
            let node = &mut *node_ptr.as_ptr();
            node.value = value;
            node.access_count += 1;
            Some(node.access_count >= self.threshold)
        }
    }

    /// Insert or overwrite. Returns the key evicted from the main list, if
    /// any, for the caller's ghost decision. Fresh nodes start at access
    /// count 1.
    fn put(&mut self, key: K, value: V) -> Option<K> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&node_ptr) = self.map.get(&key) {
            self.detach(node_ptr);
            self.attach_front(node_ptr);
            unsafe {
                (*node_ptr.as_ptr()).value = value;
            }
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict_least_recent()
        } else {
            None
        };

        let node = Box::new(Node {
            prev: None,
            next: None,
            key: key.clone(),
            value,
            access_count: 1,
        });
        let node_ptr = NonNull::from(Box::leak(node));
        self.map.insert(key, node_ptr);
        self.attach_front(node_ptr);

        evicted
    }

    fn contains_main(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Consume a ghost entry. Returns `true` on a ghost hit.
    fn check_ghost(&mut self, key: &K) -> bool {
        self.ghost.remove(key)
    }

    fn record_ghost(&mut self, key: K) {
        self.ghost.record(key);
    }

    fn increase_capacity(&mut self) {
        self.capacity += 1;
    }

    fn decrease_capacity(&mut self) -> Shrink<K> {
        if self.capacity == 0 {
            return Shrink::Refused;
        }
        let evicted = if self.map.len() >= self.capacity {
            self.evict_least_recent()
        } else {
            None
        };
        self.capacity -= 1;
        Shrink::Shrunk(evicted)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn reset(&mut self, capacity: usize) {
        while self.evict_least_recent().is_some() {}
        self.map.clear();
        self.ghost.clear();
        self.capacity = capacity;
    }
}

impl<K, V> Drop for RecencyPart<K, V>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        while self.evict_least_recent().is_some() {}
    }
}

// ---------------------------------------------------------------------------
// Frequency part
// ---------------------------------------------------------------------------

struct FreqEntry<V> {
    value: V,
    freq: u64,
}

/// Frequency-bucket main cache with a ghost list.
///
/// Buckets are FIFO deques keyed by frequency in an ordered map, so the
/// fallback "smallest present frequency" lookup on eviction is a first-key
/// read.
struct FrequencyPart<K, V>
where
    K: Eq + Hash + Clone,
{
    capacity: usize,
    min_freq: u64,
    map: FxHashMap<K, FreqEntry<V>>,
    freq_lists: BTreeMap<u64, VecDeque<K>>,
    ghost: GhostList<K>,
}

impl<K, V> FrequencyPart<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            min_freq: 0,
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            freq_lists: BTreeMap::new(),
            ghost: GhostList::new(capacity),
        }
    }

    /// Move a resident key up one frequency bucket.
    fn bump(&mut self, key: &K) {
        let Some(entry) = self.map.get_mut(key) else {
            return;
        };
        let old_freq = entry.freq;
        let new_freq = old_freq.saturating_add(1);
        entry.freq = new_freq;

        let old_emptied = match self.freq_lists.get_mut(&old_freq) {
            Some(list) => {
                if let Some(pos) = list.iter().position(|k| k == key) {
                    list.remove(pos);
                }
                list.is_empty()
            }
            None => false,
        };
        if old_emptied {
            self.freq_lists.remove(&old_freq);
            if self.min_freq == old_freq {
                self.min_freq = new_freq;
            }
        }

        self.freq_lists.entry(new_freq).or_default().push_back(key.clone());
    }

    fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        if !self.map.contains_key(key) {
            return None;
        }
        self.bump(key);
        self.map.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or overwrite. Returns the key evicted from the main cache, if
    /// any, for the caller's ghost decision.
    fn put(&mut self, key: K, value: V) -> Option<K> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(entry) = self.map.get_mut(&key) {
            entry.value = value;
            self.bump(&key);
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict_least_frequent()
        } else {
            None
        };

        self.map.insert(key.clone(), FreqEntry { value, freq: 1 });
        self.freq_lists.entry(1).or_default().push_back(key);
        self.min_freq = 1;

        evicted
    }

    /// Remove the oldest entry in the minimum-frequency bucket.
    fn evict_least_frequent(&mut self) -> Option<K> {
        if self.freq_lists.is_empty() {
            return None;
        }

        let mut freq = self.min_freq;
        if !self.freq_lists.contains_key(&freq) {
            freq = *self.freq_lists.keys().next()?;
            self.min_freq = freq;
        }

        let (key, emptied) = {
            let list = self.freq_lists.get_mut(&freq)?;
            let key = list.pop_front()?;
            (key, list.is_empty())
        };
        if emptied {
            self.freq_lists.remove(&freq);
            if let Some(&next) = self.freq_lists.keys().next() {
                self.min_freq = next;
            }
        }

        self.map.remove(&key);
        Some(key)
    }

    fn contains_main(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn check_ghost(&mut self, key: &K) -> bool {
        self.ghost.remove(key)
    }

    fn record_ghost(&mut self, key: K) {
        self.ghost.record(key);
    }

    fn increase_capacity(&mut self) {
        self.capacity += 1;
    }

    fn decrease_capacity(&mut self) -> Shrink<K> {
        if self.capacity == 0 {
            return Shrink::Refused;
        }
        let evicted = if self.map.len() >= self.capacity {
            self.evict_least_frequent()
        } else {
            None
        };
        self.capacity -= 1;
        Shrink::Shrunk(evicted)
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        self.map.get(key).map(|entry| entry.freq)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn reset(&mut self, capacity: usize) {
        self.map.clear();
        self.freq_lists.clear();
        self.ghost.clear();
        self.min_freq = 0;
        self.capacity = capacity;
    }
}

// ---------------------------------------------------------------------------
// ARC engine
// ---------------------------------------------------------------------------

/// Adaptive Replacement Cache engine.
///
/// Both parts start with `capacity` main slots and `capacity` ghost slots;
/// ghost hits shift main capacity between them one unit at a time. Keys
/// whose access count in the recency part reaches the transform threshold
/// are copied into the frequency part, where they survive recency churn.
///
/// # Example
///
/// ```
/// use evictkit::policy::arc::ArcCache;
/// use evictkit::traits::CachePolicy;
///
/// let cache = ArcCache::with_threshold(100, 3);
/// cache.put(1, "page");
/// assert_eq!(cache.get(&1), Some("page"));
/// assert_eq!(cache.recency_capacity(), 100);
/// assert_eq!(cache.frequency_capacity(), 100);
/// ```
pub struct ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    initial_capacity: usize,
    threshold: u64,
    recency: Mutex<RecencyPart<K, V>>,
    frequency: Mutex<FrequencyPart<K, V>>,
}

impl<K, V> ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an ARC engine with the default promotion threshold
    /// ([`DEFAULT_TRANSFORM_THRESHOLD`]).
    pub fn new(capacity: usize) -> Self {
        Self::with_threshold(capacity, DEFAULT_TRANSFORM_THRESHOLD)
    }

    /// Creates an ARC engine with an explicit promotion threshold.
    pub fn with_threshold(capacity: usize, threshold: u64) -> Self {
        Self {
            initial_capacity: capacity,
            threshold,
            recency: Mutex::new(RecencyPart::new(capacity, threshold)),
            frequency: Mutex::new(FrequencyPart::new(capacity)),
        }
    }

    /// Consume a ghost entry and shift one unit of capacity toward the part
    /// whose ghost was hit. The complementary decrease runs first; if it
    /// refuses (zero capacity), the increase is cancelled.
    fn check_ghost_caches(
        recency: &mut RecencyPart<K, V>,
        frequency: &mut FrequencyPart<K, V>,
        key: &K,
    ) -> Option<GhostHit> {
        if recency.check_ghost(key) {
            if let Shrink::Shrunk(evicted) = frequency.decrease_capacity() {
                Self::settle_frequency_eviction(recency, frequency, evicted);
                recency.increase_capacity();
            }
            Some(GhostHit::Recency)
        } else if frequency.check_ghost(key) {
            if let Shrink::Shrunk(evicted) = recency.decrease_capacity() {
                Self::settle_recency_eviction(recency, frequency, evicted);
                frequency.increase_capacity();
            }
            Some(GhostHit::Frequency)
        } else {
            None
        }
    }

    /// Ghost a recency-main victim unless it is still resident in the
    /// frequency part (promoted copies are not mispredictions).
    fn settle_recency_eviction(
        recency: &mut RecencyPart<K, V>,
        frequency: &FrequencyPart<K, V>,
        evicted: Option<K>,
    ) {
        if let Some(key) = evicted {
            if !frequency.contains_main(&key) {
                recency.record_ghost(key);
            }
        }
    }

    /// Ghost a frequency-main victim unless it is still resident in the
    /// recency part.
    fn settle_frequency_eviction(
        recency: &RecencyPart<K, V>,
        frequency: &mut FrequencyPart<K, V>,
        evicted: Option<K>,
    ) {
        if let Some(key) = evicted {
            if !recency.contains_main(&key) {
                frequency.record_ghost(key);
            }
        }
    }

    /// Stores or overwrites an entry.
    ///
    /// Routing order: ghost hits reinsert into the part whose ghost was
    /// touched (after the capacity shift); a hit in either main cache is an
    /// in-place overwrite of that cache; fresh keys enter the recency part.
    pub fn put(&self, key: K, value: V)
    where
        V: Clone,
    {
        let mut recency = self.recency.lock();
        let mut frequency = self.frequency.lock();

        match Self::check_ghost_caches(&mut recency, &mut frequency, &key) {
            Some(GhostHit::Recency) => {
                let evicted = recency.put(key, value);
                Self::settle_recency_eviction(&mut recency, &frequency, evicted);
            }
            Some(GhostHit::Frequency) => {
                let evicted = frequency.put(key, value);
                Self::settle_frequency_eviction(&recency, &mut frequency, evicted);
            }
            None => {
                if recency.contains_main(&key) {
                    let transform = matches!(recency.update(&key, value.clone()), Some(true));
                    if transform {
                        let evicted = frequency.put(key, value);
                        Self::settle_frequency_eviction(&recency, &mut frequency, evicted);
                    }
                } else if frequency.contains_main(&key) {
                    frequency.put(key, value);
                } else {
                    let evicted = recency.put(key, value);
                    Self::settle_recency_eviction(&mut recency, &frequency, evicted);
                }
            }
        }
    }

    /// Retrieves a value.
    ///
    /// Ghost hits adjust the capacity split even on a read, since a ghost hit is
    /// a signal about workload shape regardless of read/write. A recency hit
    /// that reaches the promotion threshold copies the entry into the
    /// frequency part before returning.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let mut recency = self.recency.lock();
        let mut frequency = self.frequency.lock();

        Self::check_ghost_caches(&mut recency, &mut frequency, key);

        if let Some((value, transform)) = recency.get(key) {
            if transform {
                let evicted = frequency.put(key.clone(), value.clone());
                Self::settle_frequency_eviction(&recency, &mut frequency, evicted);
            }
            return Some(value);
        }

        frequency.get(key)
    }

    /// Returns `true` if the key is resident in either main cache.
    pub fn contains(&self, key: &K) -> bool {
        let recency = self.recency.lock();
        let frequency = self.frequency.lock();
        recency.contains_main(key) || frequency.contains_main(key)
    }

    /// Returns the current capacity share of the recency part (`c_r`).
    pub fn recency_capacity(&self) -> usize {
        self.recency.lock().capacity
    }

    /// Returns the current capacity share of the frequency part (`c_f`).
    pub fn frequency_capacity(&self) -> usize {
        self.frequency.lock().capacity
    }

    /// Returns the promotion threshold.
    pub fn transform_threshold(&self) -> u64 {
        self.threshold
    }

    /// Returns the frequency-part counter for a key, if resident there.
    pub fn frequency_of(&self, key: &K) -> Option<u64> {
        self.frequency.lock().frequency(key)
    }

    /// Empties both parts and their ghosts, restoring the constructed
    /// capacity split.
    pub fn purge(&self) {
        let mut recency = self.recency.lock();
        let mut frequency = self.frequency.lock();
        recency.reset(self.initial_capacity);
        frequency.reset(self.initial_capacity);
    }

    /// Returns the number of resident entries across both parts.
    ///
    /// A promoted key resident in both parts counts once per part.
    pub fn len(&self) -> usize {
        let recency = self.recency.lock();
        let frequency = self.frequency.lock();
        recency.len() + frequency.len()
    }

    /// Returns `true` if both parts are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the combined capacity (`c_r + c_f`). Constant in total; the
    /// per-part shares drift with ghost hits.
    pub fn capacity(&self) -> usize {
        let recency = self.recency.lock();
        let frequency = self.frequency.lock();
        recency.capacity + frequency.capacity
    }

    /// Verifies the disjointness and size invariants.
    ///
    /// Cheap relative to capacity; intended for tests and diagnostics.
    pub fn check_invariants(&self) -> Result<(), CacheError> {
        let recency = self.recency.lock();
        let frequency = self.frequency.lock();

        if recency.len() > recency.capacity {
            return Err(CacheError::invariant(format!(
                "recency main {} exceeds capacity {}",
                recency.len(),
                recency.capacity
            )));
        }
        if frequency.len() > frequency.capacity {
            return Err(CacheError::invariant(format!(
                "frequency main {} exceeds capacity {}",
                frequency.len(),
                frequency.capacity
            )));
        }

        for key in recency.ghost.keys() {
            if recency.contains_main(key) || frequency.contains_main(key) {
                return Err(CacheError::invariant("recency ghost overlaps a main cache"));
            }
            if frequency.ghost.contains(key) {
                return Err(CacheError::invariant("ghost lists overlap"));
            }
        }
        for key in frequency.ghost.keys() {
            if recency.contains_main(key) || frequency.contains_main(key) {
                return Err(CacheError::invariant("frequency ghost overlaps a main cache"));
            }
        }

        Ok(())
    }
}

impl<K, V> CachePolicy<K, V> for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        ArcCache::put(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        ArcCache::get(self, key)
    }

    fn purge(&self) {
        ArcCache::purge(self)
    }

    fn len(&self) -> usize {
        ArcCache::len(self)
    }

    fn capacity(&self) -> usize {
        ArcCache::capacity(self)
    }
}

impl<K, V> ConcurrentCache for ArcCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send,
{
}

impl<K, V> fmt::Debug for ArcCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recency = self.recency.lock();
        let frequency = self.frequency.lock();
        f.debug_struct("ArcCache")
            .field("recency_len", &recency.len())
            .field("recency_capacity", &recency.capacity)
            .field("frequency_len", &frequency.len())
            .field("frequency_capacity", &frequency.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_keys_enter_recency_part() {
        let cache = ArcCache::new(4);
        cache.put(1, 10);
        assert!(cache.contains(&1));
        assert_eq!(cache.len(), 1);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn threshold_access_copies_into_frequency_part() {
        let cache = ArcCache::with_threshold(4, 2);
        cache.put(1, 10);
        assert_eq!(cache.get(&1), Some(10)); // count 2: promoted
        assert_eq!(cache.frequency_of(&1), Some(1));
        assert_eq!(cache.get(&1), Some(10)); // recency hit again, freq bumps
        assert_eq!(cache.frequency_of(&1), Some(2));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn recency_churn_fills_ghost_list() {
        let cache = ArcCache::new(2);
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3); // evicts 1 into the recency ghost
        assert!(!cache.contains(&1));
        cache.check_invariants().unwrap();

        // ghost hit on 1: c_r grows at c_f's expense
        cache.put(1, 1);
        assert_eq!(cache.recency_capacity(), 3);
        assert_eq!(cache.frequency_capacity(), 1);
        assert!(cache.contains(&1));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn ghost_hit_adjusts_capacity_even_on_get() {
        let cache = ArcCache::new(2);
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3); // 1 ghosted

        assert_eq!(cache.get(&1), None); // miss, but the signal counts
        assert_eq!(cache.recency_capacity(), 3);
        assert_eq!(cache.frequency_capacity(), 1);

        // the ghost entry was consumed by the check
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.recency_capacity(), 3);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn zero_capacity_part_refuses_shift() {
        let cache = ArcCache::new(1);
        cache.put(1, 1);
        cache.put(2, 2); // 1 ghosted
        cache.put(1, 1); // ghost hit: c_f 1 -> 0, c_r 1 -> 2
        assert_eq!(cache.recency_capacity(), 2);
        assert_eq!(cache.frequency_capacity(), 0);

        cache.put(3, 3); // 2 ghosted (recency full at 2 entries)
        cache.put(2, 2); // ghost hit, but c_f is 0: shift refused
        assert_eq!(cache.recency_capacity(), 2);
        assert_eq!(cache.frequency_capacity(), 0);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn promotion_then_ghost_routing_trace() {
        // capacity 4, threshold 2
        let cache = ArcCache::new(4);
        for k in 1..=4 {
            cache.put(k, k * 10);
        }
        // promote 1 into the frequency part
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.frequency_of(&1), Some(2));

        // churn the recency part; 1 is evicted from recency main but stays
        // resident in the frequency part, so it must not be ghosted
        for k in 5..=8 {
            cache.put(k, k * 10);
        }
        cache.check_invariants().unwrap();

        // a frequency-part write, not a ghost-driven capacity shift
        cache.put(1, 111);
        assert_eq!(cache.recency_capacity(), 4);
        assert_eq!(cache.frequency_capacity(), 4);
        assert_eq!(cache.get(&1), Some(111));

        // 2 was ghosted by the churn: this put shifts one unit of capacity
        cache.put(2, 222);
        assert_eq!(cache.recency_capacity(), 5);
        assert_eq!(cache.frequency_capacity(), 3);
        assert!(cache.contains(&2));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn frequency_part_evicts_least_frequent_into_its_ghost() {
        let cache = ArcCache::with_threshold(2, 1);
        // threshold 1: first get promotes
        cache.put(1, 1);
        cache.get(&1);
        cache.put(2, 2);
        cache.get(&2);
        cache.get(&2); // freq(2) above freq(1)
        cache.put(3, 3);
        cache.get(&3); // frequency part full: promoting 3 evicts 1

        assert_eq!(cache.frequency_of(&3), Some(1));
        assert_eq!(cache.frequency_of(&1), None);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn purge_restores_constructed_split() {
        let cache = ArcCache::new(2);
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3);
        cache.put(1, 1); // shift capacity
        assert_ne!(cache.recency_capacity(), cache.frequency_capacity());

        cache.purge();
        assert!(cache.is_empty());
        assert_eq!(cache.recency_capacity(), 2);
        assert_eq!(cache.frequency_capacity(), 2);
        assert_eq!(cache.get(&1), None);
        // ghosts were cleared too: no capacity shift from the old entries
        assert_eq!(cache.recency_capacity(), 2);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn zero_capacity_cache_is_inert() {
        let cache = ArcCache::new(0);
        cache.put(1, 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.capacity(), 0);
    }
}
