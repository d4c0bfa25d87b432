//! # LRU-K Admission Filter
//!
//! An LRU cache guarded by an admission filter: a key is installed into the
//! primary cache only after it has been observed `k` times within the window
//! defined by a history LRU. One-hit wonders, keys touched once by a scan,
//! never displace the working set.
//!
//! ## Architecture
//!
//! ```text
//!   get/put ──► history LRU (K → observation count, bounded)
//!                      │
//!                count ≥ k ?
//!                      │ yes (on put)
//!                      ▼
//!              primary LRU (K → V, bounded)
//! ```
//!
//! Both structures live under one engine mutex; a `put` or `get` is a single
//! atomic step against both.
//!
//! ## Admission rule
//!
//! - `get(k)` records an observation (history count + 1) and returns the
//!   primary's value if resident.
//! - `put(k, v)` overwrites in place when `k` is already resident. Otherwise
//!   it compares the history count *before* this access against the
//!   threshold: at `count >= k` the key is admitted (history entry consumed,
//!   value installed); below it the observation is recorded and the value is
//!   dropped.
//!
//! So `k` observations arm a key, and the next `put` installs it. The
//! history LRU's own capacity bounds the observation window: counters fall
//! out of history exactly like cache entries fall out of an LRU.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::lru_k::LruKCache;
//! use evictkit::traits::CachePolicy;
//!
//! let cache = LruKCache::new(8, 32, 2);
//!
//! cache.put("page", 1); // observation 1, not admitted
//! assert_eq!(cache.get(&"page"), None); // observation 2, armed
//!
//! cache.put("page", 1); // count reached 2, admitted
//! assert_eq!(cache.get(&"page"), Some(1));
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::policy::lru::LruCore;
use crate::traits::{CachePolicy, ConcurrentCache};

struct LruKInner<K, V>
where
    K: Eq + Hash + Clone,
{
    primary: LruCore<K, V>,
    history: LruCore<K, u64>,
}

/// LRU cache with LRU-K admission filtering.
///
/// A primary LRU of `capacity` holds admitted entries; a history LRU of
/// `history_capacity` holds observation counters for keys still on
/// probation. `k` is the number of observations required for admission.
///
/// `k = 0` disables filtering: every `put` installs immediately.
pub struct LruKCache<K, V>
where
    K: Eq + Hash + Clone,
{
    k: u64,
    inner: Arc<Mutex<LruKInner<K, V>>>,
}

impl<K, V> Clone for LruKCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn clone(&self) -> Self {
        Self {
            k: self.k,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> LruKCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU-K engine.
    ///
    /// - `capacity`: primary cache size (0 makes every `put` a no-op)
    /// - `history_capacity`: observation window size
    /// - `k`: observations required before a key is admitted
    pub fn new(capacity: usize, history_capacity: usize, k: u64) -> Self {
        Self {
            k,
            inner: Arc::new(Mutex::new(LruKInner {
                primary: LruCore::new(capacity),
                history: LruCore::new(history_capacity),
            })),
        }
    }

    /// Records an observation and returns the primary's value if resident.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let mut inner = self.inner.lock();
        let count = inner.history.get(key).copied().unwrap_or(0);
        inner.history.insert(key.clone(), count + 1);
        inner.primary.get(key).cloned()
    }

    /// Stores a value, subject to the admission rule.
    ///
    /// A resident key is overwritten in place. A non-resident key is
    /// admitted only once its observation count has reached `k`; otherwise
    /// the observation is recorded and the value discarded.
    pub fn put(&self, key: K, value: V) {
        let mut inner = self.inner.lock();

        if inner.primary.contains(&key) {
            inner.primary.insert(key, value);
            return;
        }

        let count = inner.history.get(&key).copied().unwrap_or(0);
        if count >= self.k {
            inner.history.remove(&key);
            inner.primary.insert(key, value);
        } else {
            inner.history.insert(key, count + 1);
        }
    }

    /// Returns `true` if the key is resident in the primary cache.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().primary.contains(key)
    }

    /// Returns the admission threshold.
    pub fn k_value(&self) -> u64 {
        self.k
    }

    /// Returns the observation count for a key still on probation.
    ///
    /// `None` once the key has been admitted (or never observed).
    pub fn history_count(&self, key: &K) -> Option<u64> {
        self.inner.lock().history.peek(key).copied()
    }

    /// Returns the number of keys currently on probation.
    pub fn history_len(&self) -> usize {
        self.inner.lock().history.len()
    }

    /// Empties the primary cache and the observation history.
    pub fn purge(&self) {
        let mut inner = self.inner.lock();
        inner.primary.clear();
        inner.history.clear();
    }

    /// Returns the number of admitted entries.
    pub fn len(&self) -> usize {
        self.inner.lock().primary.len()
    }

    /// Returns `true` if the primary cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().primary.is_empty()
    }

    /// Returns the primary cache capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().primary.capacity()
    }
}

impl<K, V> CachePolicy<K, V> for LruKCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        LruKCache::put(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        LruKCache::get(self, key)
    }

    fn purge(&self) {
        LruKCache::purge(self)
    }

    fn len(&self) -> usize {
        LruKCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruKCache::capacity(self)
    }
}

impl<K, V> ConcurrentCache for LruKCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send,
{
}

impl<K, V> fmt::Debug for LruKCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("LruKCache")
            .field("k", &self.k)
            .field("len", &inner.primary.len())
            .field("capacity", &inner.primary.capacity())
            .field("history_len", &inner.history.len())
            .finish_non_exhaustive()
    }
}
