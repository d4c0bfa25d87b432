//! # Least Frequently Used (LFU) Cache Engine with Aging
//!
//! Frequency-ordered cache: every entry carries an access frequency, entries
//! with equal frequency live in a FIFO bucket, and eviction takes the head
//! of the minimum-frequency bucket (oldest among the equally infrequent).
//!
//! ## Aging
//!
//! Plain LFU lets long-lived hot keys accumulate unbounded frequency and
//! starve newer arrivals. This engine tracks the running sum of all
//! frequencies (`cur_total`) and the integer average (`cur_total / len`);
//! whenever the average exceeds the configured `max_average`, every entry's
//! frequency is reduced by `max_average / 2` (clamped to a minimum of 1) and
//! the bucket index is rebuilt:
//!
//! ```text
//!   access ─► bump freq ─► cur_average = cur_total / len
//!                               │
//!                 cur_average > max_average ?
//!                               │ yes
//!                               ▼
//!          ∀ node: freq ← max(1, freq − max_average/2)
//!          rebuild buckets, min_freq ← smallest surviving freq
//! ```
//!
//! ## State
//!
//! | Field         | Role                                                |
//! |---------------|-----------------------------------------------------|
//! | `index`       | key → slot index                                    |
//! | `buckets`     | freq → FIFO list of slots at that frequency         |
//! | `min_freq`    | smallest frequency present (0 when empty)           |
//! | `cur_total`   | Σ freq over all resident entries                    |
//! | `cur_average` | `cur_total / len`, integer division                 |
//! | `max_average` | aging trigger threshold (default 10)                |
//!
//! Entries are stored in a slot vector with an internal free list; bucket
//! membership is a pair of intra-slot links, so bucket moves are O(1).
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::lfu::LfuCache;
//! use evictkit::traits::CachePolicy;
//!
//! let cache = LfuCache::new(2);
//! cache.put(1, "one");
//! cache.put(2, "two");
//! cache.get(&1);
//! cache.get(&1);
//!
//! // Key 2 has the lowest frequency and is evicted
//! cache.put(3, "three");
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.get(&1), Some("one"));
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::CacheError;
use crate::traits::{CachePolicy, ConcurrentCache};

/// Aging threshold used by [`LfuCache::new`].
pub const DEFAULT_MAX_AVERAGE: u64 = 10;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    freq: u64,
}

#[derive(Debug)]
struct Slot<K, V> {
    entry: Option<Entry<K, V>>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// FIFO list of slots sharing one frequency. Head is oldest.
#[derive(Debug, Default)]
struct FreqList {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

/// Single-threaded LFU core with average-frequency aging.
///
/// Thread safety is provided by the [`LfuCache`] wrapper.
///
/// # Example
///
/// ```
/// use evictkit::policy::lfu::LfuCore;
///
/// let mut core: LfuCore<u32, u32> = LfuCore::new(2, 10);
/// core.insert(1, 10);
/// core.insert(2, 20);
/// core.get(&1);
///
/// core.insert(3, 30); // evicts key 2 (lowest frequency)
/// assert!(!core.contains(&2));
/// assert_eq!(core.frequency(&1), Some(2));
/// ```
#[derive(Debug)]
pub struct LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    capacity: usize,
    max_average: u64,
    min_freq: u64,
    cur_total: u64,
    cur_average: u64,
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
    index: FxHashMap<K, usize>,
    buckets: FxHashMap<u64, FreqList>,
}

impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LFU core with the given capacity and aging threshold.
    pub fn new(capacity: usize, max_average: u64) -> Self {
        LfuCore {
            capacity,
            max_average,
            min_freq: 0,
            cur_total: 0,
            cur_average: 0,
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
        }
    }

    // -- slot + bucket plumbing -------------------------------------------

    fn allocate(&mut self, entry: Entry<K, V>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Slot {
                entry: Some(entry),
                prev: None,
                next: None,
            };
            idx
        } else {
            self.slots.push(Slot {
                entry: Some(entry),
                prev: None,
                next: None,
            });
            self.slots.len() - 1
        }
    }

    fn release(&mut self, idx: usize) -> Entry<K, V> {
        let entry = self.slots[idx].entry.take().expect("lfu entry missing");
        self.slots[idx].prev = None;
        self.slots[idx].next = None;
        self.free.push(idx);
        entry
    }

    fn list_push_back(slots: &mut [Slot<K, V>], list: &mut FreqList, idx: usize) {
        let old_tail = list.tail;
        slots[idx].prev = old_tail;
        slots[idx].next = None;
        if let Some(tail_idx) = old_tail {
            slots[tail_idx].next = Some(idx);
        } else {
            list.head = Some(idx);
        }
        list.tail = Some(idx);
        list.len += 1;
    }

    fn list_remove(slots: &mut [Slot<K, V>], list: &mut FreqList, idx: usize) {
        let prev = slots[idx].prev;
        let next = slots[idx].next;
        if let Some(prev_idx) = prev {
            slots[prev_idx].next = next;
        } else {
            list.head = next;
        }
        if let Some(next_idx) = next {
            slots[next_idx].prev = prev;
        } else {
            list.tail = prev;
        }
        slots[idx].prev = None;
        slots[idx].next = None;
        list.len -= 1;
    }

    fn list_pop_front(slots: &mut [Slot<K, V>], list: &mut FreqList) -> Option<usize> {
        let idx = list.head?;
        Self::list_remove(slots, list, idx);
        Some(idx)
    }

    fn push_to_bucket(&mut self, freq: u64, idx: usize) {
        let bucket = self.buckets.entry(freq).or_default();
        Self::list_push_back(&mut self.slots, bucket, idx);
    }

    // -- frequency accounting ---------------------------------------------

    fn refresh_average(&mut self) {
        self.cur_average = if self.index.is_empty() {
            0
        } else {
            self.cur_total / self.index.len() as u64
        };
    }

    /// One access happened: bump the running total and age if the average
    /// crossed the threshold.
    fn add_access(&mut self) {
        self.cur_total += 1;
        self.refresh_average();
        if self.cur_average > self.max_average {
            self.age();
        }
    }

    /// Bulk frequency decay: subtract `max_average / 2` from every entry
    /// (clamped to 1) and rebuild the bucket index.
    fn age(&mut self) {
        if self.index.is_empty() {
            return;
        }

        self.buckets.clear();
        let decay = self.max_average / 2;
        let mut new_min = u64::MAX;

        for idx in 0..self.slots.len() {
            let aged = match self.slots[idx].entry.as_mut() {
                Some(entry) => {
                    let old = entry.freq;
                    let aged = old.saturating_sub(decay).max(1);
                    entry.freq = aged;
                    self.cur_total -= old - aged;
                    aged
                }
                None => continue,
            };
            new_min = new_min.min(aged);
            self.push_to_bucket(aged, idx);
        }

        self.min_freq = if new_min == u64::MAX { 1 } else { new_min };
        self.refresh_average();
    }

    /// Move a resident entry up one frequency bucket.
    fn bump(&mut self, idx: usize) {
        let old_freq = self.slots[idx]
            .entry
            .as_ref()
            .expect("lfu entry missing")
            .freq;

        // Saturated counters keep their bucket, only refreshing FIFO position.
        let new_freq = if old_freq == u64::MAX {
            old_freq
        } else {
            old_freq + 1
        };

        let emptied = match self.buckets.get_mut(&old_freq) {
            Some(bucket) => {
                Self::list_remove(&mut self.slots, bucket, idx);
                bucket.len == 0
            }
            None => false,
        };
        if emptied {
            self.buckets.remove(&old_freq);
        }

        if let Some(entry) = self.slots[idx].entry.as_mut() {
            entry.freq = new_freq;
        }
        self.push_to_bucket(new_freq, idx);

        if old_freq == self.min_freq && !self.buckets.contains_key(&old_freq) {
            self.min_freq = new_freq;
        }

        self.add_access();
    }

    /// Evict the oldest entry in the minimum-frequency bucket.
    ///
    /// `min_freq` is not eagerly maintained across evictions (the next fresh
    /// insert resets it to 1); if the recorded bucket turns out empty, the
    /// true minimum is recomputed here before picking a victim.
    fn evict_min(&mut self) -> Option<(K, V)> {
        if self.index.is_empty() {
            return None;
        }

        let stale = self.min_freq == 0
            || self
                .buckets
                .get(&self.min_freq)
                .is_none_or(|bucket| bucket.len == 0);
        if stale {
            self.min_freq = self
                .buckets
                .iter()
                .filter(|(_, bucket)| bucket.len > 0)
                .map(|(&freq, _)| freq)
                .min()?;
        }

        let freq = self.min_freq;
        let idx = {
            let bucket = self.buckets.get_mut(&freq)?;
            Self::list_pop_front(&mut self.slots, bucket)?
        };
        if self.buckets.get(&freq).is_some_and(|bucket| bucket.len == 0) {
            self.buckets.remove(&freq);
        }

        let entry = self.release(idx);
        self.index.remove(&entry.key);
        self.cur_total -= entry.freq;
        self.refresh_average();
        Some((entry.key, entry.value))
    }

    // -- public operations --------------------------------------------------

    /// Inserts or overwrites an entry, returning the previous value.
    ///
    /// Overwriting counts as an access (the entry's frequency is bumped).
    /// A fresh key enters bucket 1, evicting the least frequent entry first
    /// when the core is full. With capacity 0 this is a no-op.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&idx) = self.index.get(&key) {
            let previous = self.slots[idx]
                .entry
                .as_mut()
                .map(|entry| std::mem::replace(&mut entry.value, value));
            self.bump(idx);
            return previous;
        }

        if self.index.len() >= self.capacity {
            self.evict_min();
        }

        let idx = self.allocate(Entry {
            key: key.clone(),
            value,
            freq: 1,
        });
        self.index.insert(key, idx);
        self.push_to_bucket(1, idx);
        self.min_freq = 1;
        self.add_access();
        None
    }

    /// Looks up an entry, bumping its frequency on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.bump(idx);
        self.slots[idx].entry.as_ref().map(|entry| &entry.value)
    }

    /// Returns `true` if the key is resident. Does not affect frequency.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the current frequency of a resident key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let idx = *self.index.get(key)?;
        self.slots[idx].entry.as_ref().map(|entry| entry.freq)
    }

    /// Returns the integer average frequency (`cur_total / len`, 0 if empty).
    #[inline]
    pub fn average_frequency(&self) -> u64 {
        self.cur_average
    }

    /// Returns the smallest frequency present, or `None` when empty.
    pub fn min_frequency(&self) -> Option<u64> {
        if self.index.is_empty() {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Returns the number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the core holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the configured capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Empties everything and resets the frequency accounting.
    pub fn purge(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
        self.cur_total = 0;
        self.cur_average = 0;
    }

    /// Verifies the map/bucket bijection and the frequency accounting.
    ///
    /// Cheap enough for tests; not called on the hot path.
    pub fn check_invariants(&self) -> Result<(), CacheError> {
        let mut seen = 0usize;
        let mut total = 0u64;
        let mut actual_min = u64::MAX;

        for (&freq, bucket) in &self.buckets {
            if bucket.len == 0 {
                return Err(CacheError::invariant(format!("empty bucket kept for freq {freq}")));
            }
            actual_min = actual_min.min(freq);

            let mut current = bucket.head;
            let mut last = None;
            let mut count = 0usize;
            while let Some(idx) = current {
                let slot = &self.slots[idx];
                let entry = slot
                    .entry
                    .as_ref()
                    .ok_or_else(|| CacheError::invariant("bucket references freed slot"))?;
                if entry.freq != freq {
                    return Err(CacheError::invariant(format!(
                        "entry freq {} filed under bucket {freq}",
                        entry.freq
                    )));
                }
                if self.index.get(&entry.key) != Some(&idx) {
                    return Err(CacheError::invariant("bucket entry missing from index"));
                }
                if slot.prev != last {
                    return Err(CacheError::invariant("bucket back-link mismatch"));
                }
                total += entry.freq;
                last = Some(idx);
                current = slot.next;
                count += 1;
                if count > self.index.len() {
                    return Err(CacheError::invariant("cycle detected in bucket list"));
                }
            }
            if bucket.tail != last || count != bucket.len {
                return Err(CacheError::invariant("bucket length bookkeeping mismatch"));
            }
            seen += count;
        }

        if seen != self.index.len() {
            return Err(CacheError::invariant(format!(
                "{} entries in buckets, {} in index",
                seen,
                self.index.len()
            )));
        }
        if total != self.cur_total {
            return Err(CacheError::invariant(format!(
                "cur_total {} but bucket sum {total}",
                self.cur_total
            )));
        }
        if !self.index.is_empty() && self.min_freq != actual_min {
            return Err(CacheError::invariant(format!(
                "min_freq {} but smallest bucket {actual_min}",
                self.min_freq
            )));
        }
        Ok(())
    }
}

/// Thread-safe LFU cache engine with frequency aging.
///
/// One mutex covers the whole core. The handle is cloneable; clones share
/// the same underlying cache.
///
/// # Example
///
/// ```
/// use evictkit::policy::lfu::LfuCache;
/// use evictkit::traits::CachePolicy;
///
/// let cache = LfuCache::with_max_average(100, 20);
/// cache.put(1, "hot");
/// for _ in 0..5 {
///     cache.get(&1);
/// }
/// assert_eq!(cache.frequency(&1), Some(6));
/// ```
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<Mutex<LfuCore<K, V>>>,
}

impl<K, V> Clone for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LFU engine with the default aging threshold
    /// ([`DEFAULT_MAX_AVERAGE`]).
    pub fn new(capacity: usize) -> Self {
        Self::with_max_average(capacity, DEFAULT_MAX_AVERAGE)
    }

    /// Creates an LFU engine with an explicit aging threshold.
    ///
    /// # Panics
    ///
    /// Panics if `max_average` is 0. Use
    /// [`try_with_max_average`](Self::try_with_max_average) to validate
    /// caller-supplied configuration without panicking.
    pub fn with_max_average(capacity: usize, max_average: u64) -> Self {
        assert!(max_average > 0, "max_average must be > 0");
        Self {
            inner: Arc::new(Mutex::new(LfuCore::new(capacity, max_average))),
        }
    }

    /// Fallible constructor for caller-supplied configuration.
    pub fn try_with_max_average(capacity: usize, max_average: u64) -> Result<Self, CacheError> {
        if max_average == 0 {
            return Err(CacheError::config("max_average must be > 0"));
        }
        Ok(Self::with_max_average(capacity, max_average))
    }

    /// Stores or overwrites an entry. Overwriting counts as an access.
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().insert(key, value);
    }

    /// Retrieves a value, bumping the entry's frequency on a hit.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Returns `true` if the key is resident. Does not affect frequency.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Returns the current frequency of a resident key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    /// Returns the integer average frequency across resident entries.
    pub fn average_frequency(&self) -> u64 {
        self.inner.lock().average_frequency()
    }

    /// Empties everything and resets the frequency accounting.
    pub fn purge(&self) {
        self.inner.lock().purge();
    }

    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the engine holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Verifies internal invariants. Intended for tests and diagnostics.
    pub fn check_invariants(&self) -> Result<(), CacheError> {
        self.inner.lock().check_invariants()
    }
}

impl<K, V> CachePolicy<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        LfuCache::put(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        LfuCache::get(self, key)
    }

    fn purge(&self) {
        LfuCache::purge(self)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        LfuCache::capacity(self)
    }
}

impl<K, V> ConcurrentCache for LfuCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send,
{
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LfuCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .field("average_frequency", &core.average_frequency())
            .finish_non_exhaustive()
    }
}
