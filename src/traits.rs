//! # Cache Capability Trait
//!
//! This module defines the capability shared by every eviction engine in the
//! library. Callers that want to swap policies program against
//! [`CachePolicy`]; concrete engines (and the sharded wrappers around them)
//! are the variants.
//!
//! ## Architecture
//!
//! ```text
//!                      ┌─────────────────────────────────────────┐
//!                      │           CachePolicy<K, V>             │
//!                      │                                         │
//!                      │  put(&self, K, V)                       │
//!                      │  get(&self, &K) → Option<V>             │
//!                      │  get_or_default(&self, &K) → V          │
//!                      │  purge(&self)                           │
//!                      │  len(&self) → usize                     │
//!                      │  is_empty(&self) → bool                 │
//!                      │  capacity(&self) → usize                │
//!                      └──────────────────┬──────────────────────┘
//!                                         │
//!      ┌───────────┬───────────┬──────────┴┬──────────────┬──────────────┐
//!      ▼           ▼           ▼           ▼              ▼              ▼
//!  LruCache    LfuCache    LruKCache   ArcCache   ShardedLruCache ShardedLfuCache
//! ```
//!
//! ## Design Notes
//!
//! - Every operation takes `&self`: engines are thread-safe as single
//!   objects, each holding one mutex over all of its state. This mirrors how
//!   the engines are consumed: shared behind an `Arc`, hit from many
//!   threads.
//! - `get` clones the value out under the engine lock, so `V: Clone` is a
//!   trait-level bound. Callers that want zero-copy sharing store `Arc<T>`
//!   values.
//! - A missing key is not an error: `get` returns `None`,
//!   [`get_or_default`](CachePolicy::get_or_default) returns
//!   `V::default()`.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::lru::LruCache;
//! use evictkit::policy::lfu::LfuCache;
//! use evictkit::traits::CachePolicy;
//!
//! fn warm<C: CachePolicy<u64, String>>(cache: &C, rows: &[(u64, &str)]) {
//!     for (key, value) in rows {
//!         cache.put(*key, value.to_string());
//!     }
//! }
//!
//! let lru = LruCache::new(100);
//! let lfu = LfuCache::new(100);
//! warm(&lru, &[(1, "one"), (2, "two")]);
//! warm(&lfu, &[(1, "one"), (2, "two")]);
//! assert_eq!(lru.get(&1), Some("one".to_string()));
//! assert_eq!(lfu.len(), 2);
//! ```

/// Core capability implemented by every cache engine.
///
/// # Type Parameters
///
/// - `K`: Key type (engines require `Eq + Hash + Clone`)
/// - `V`: Value type, cloned out of the engine on `get`
pub trait CachePolicy<K, V: Clone> {
    /// Stores or overwrites a key-value pair.
    ///
    /// If the cache is at capacity, an entry is evicted according to the
    /// engine's policy before the new entry is installed. On an engine
    /// constructed with capacity 0 this is a no-op.
    fn put(&self, key: K, value: V);

    /// Retrieves a value by key, signalling presence through `Option`.
    ///
    /// May update internal state (recency order, frequency counters)
    /// depending on the policy.
    fn get(&self, key: &K) -> Option<V>;

    /// Convenience lookup returning `V::default()` when the key is absent.
    ///
    /// Callers that need to distinguish "absent" from "present with default
    /// value" use [`get`](Self::get).
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCache;
    /// use evictkit::traits::CachePolicy;
    ///
    /// let cache: LruCache<u64, u64> = LruCache::new(10);
    /// cache.put(1, 41);
    /// assert_eq!(cache.get_or_default(&1), 41);
    /// assert_eq!(cache.get_or_default(&99), 0);
    /// ```
    fn get_or_default(&self, key: &K) -> V
    where
        V: Default,
    {
        self.get(key).unwrap_or_default()
    }

    /// Removes every entry, returning the engine to its constructed state.
    fn purge(&self);

    /// Returns the current number of resident entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries the engine can hold.
    fn capacity(&self) -> usize;
}

/// Marker trait for engines that are safe to share across threads.
///
/// Every engine in this crate implements it; the bound exists so generic
/// code can demand thread safety explicitly:
///
/// ```
/// use std::sync::Arc;
/// use evictkit::policy::lru::LruCache;
/// use evictkit::traits::{CachePolicy, ConcurrentCache};
///
/// fn spawn_writer<C>(cache: Arc<C>)
/// where
///     C: CachePolicy<u64, u64> + ConcurrentCache + 'static,
/// {
///     std::thread::spawn(move || cache.put(1, 1)).join().unwrap();
/// }
///
/// spawn_writer(Arc::new(LruCache::new(16)));
/// ```
pub trait ConcurrentCache: Send + Sync {}
