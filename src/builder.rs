//! Unified cache builder for all eviction policies.
//!
//! Provides a single construction API over the concrete engines while hiding
//! which engine backs the cache. The returned [`Cache`] dispatches to the
//! selected policy and also implements
//! [`CachePolicy`](crate::traits::CachePolicy), so it drops into any generic
//! call site.
//!
//! ## Example
//!
//! ```
//! use evictkit::builder::{CacheBuilder, PolicyKind};
//!
//! let cache = CacheBuilder::new(100).build::<u64, String>(PolicyKind::Lru);
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some("hello".to_string()));
//! ```

use std::hash::Hash;

use crate::policy::arc::ArcCache;
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::policy::lru_k::LruKCache;
use crate::policy::sharded::{ShardedLfuCache, ShardedLruCache};
use crate::traits::CachePolicy;

/// Available cache eviction policies.
#[derive(Debug, Clone)]
pub enum PolicyKind {
    /// Least Recently Used eviction.
    Lru,
    /// Least Frequently Used eviction with aging.
    Lfu {
        /// Aging threshold; frequencies decay when the average exceeds it.
        max_average: u64,
    },
    /// LRU with LRU-K admission filtering.
    LruK {
        /// Observation window size.
        history_capacity: usize,
        /// Observations required before a key is admitted.
        k: u64,
    },
    /// Adaptive Replacement Cache.
    Arc {
        /// Access count at which a key is promoted to the frequency part.
        transform_threshold: u64,
    },
    /// Hash-sharded LRU.
    ShardedLru {
        /// Shard count; 0 resolves to available parallelism.
        shards: usize,
    },
    /// Hash-sharded LFU with aging.
    ShardedLfu {
        /// Shard count; 0 resolves to available parallelism.
        shards: usize,
        /// Aging threshold per shard.
        max_average: u64,
    },
}

/// Policy-agnostic cache produced by [`CacheBuilder`].
pub struct Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V>
where
    K: Eq + Hash + Clone,
{
    Lru(LruCache<K, V>),
    Lfu(LfuCache<K, V>),
    LruK(LruKCache<K, V>),
    Arc(ArcCache<K, V>),
    ShardedLru(ShardedLruCache<K, V>),
    ShardedLfu(ShardedLfuCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Stores or overwrites a key-value pair.
    pub fn put(&self, key: K, value: V) {
        match &self.inner {
            CacheInner::Lru(cache) => cache.put(key, value),
            CacheInner::Lfu(cache) => cache.put(key, value),
            CacheInner::LruK(cache) => cache.put(key, value),
            CacheInner::Arc(cache) => cache.put(key, value),
            CacheInner::ShardedLru(cache) => CachePolicy::put(cache, key, value),
            CacheInner::ShardedLfu(cache) => CachePolicy::put(cache, key, value),
        }
    }

    /// Retrieves a value by key.
    pub fn get(&self, key: &K) -> Option<V> {
        match &self.inner {
            CacheInner::Lru(cache) => cache.get(key),
            CacheInner::Lfu(cache) => cache.get(key),
            CacheInner::LruK(cache) => cache.get(key),
            CacheInner::Arc(cache) => cache.get(key),
            CacheInner::ShardedLru(cache) => CachePolicy::get(cache, key),
            CacheInner::ShardedLfu(cache) => CachePolicy::get(cache, key),
        }
    }

    /// Removes every entry.
    pub fn purge(&self) {
        match &self.inner {
            CacheInner::Lru(cache) => cache.purge(),
            CacheInner::Lfu(cache) => cache.purge(),
            CacheInner::LruK(cache) => cache.purge(),
            CacheInner::Arc(cache) => cache.purge(),
            CacheInner::ShardedLru(cache) => CachePolicy::purge(cache),
            CacheInner::ShardedLfu(cache) => CachePolicy::purge(cache),
        }
    }

    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(cache) => cache.len(),
            CacheInner::Lfu(cache) => cache.len(),
            CacheInner::LruK(cache) => cache.len(),
            CacheInner::Arc(cache) => cache.len(),
            CacheInner::ShardedLru(cache) => CachePolicy::len(cache),
            CacheInner::ShardedLfu(cache) => CachePolicy::len(cache),
        }
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cache capacity.
    pub fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(cache) => cache.capacity(),
            CacheInner::Lfu(cache) => cache.capacity(),
            CacheInner::LruK(cache) => cache.capacity(),
            CacheInner::Arc(cache) => cache.capacity(),
            CacheInner::ShardedLru(cache) => CachePolicy::capacity(cache),
            CacheInner::ShardedLfu(cache) => CachePolicy::capacity(cache),
        }
    }
}

impl<K, V> CachePolicy<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        Cache::put(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        Cache::get(self, key)
    }

    fn purge(&self) {
        Cache::purge(self)
    }

    fn len(&self) -> usize {
        Cache::len(self)
    }

    fn capacity(&self) -> usize {
        Cache::capacity(self)
    }
}

/// Builder for creating cache instances.
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Creates a builder with the specified (total) capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a cache with the specified policy.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::builder::{CacheBuilder, PolicyKind};
    ///
    /// // ARC with the default threshold
    /// let cache = CacheBuilder::new(100)
    ///     .build::<u64, String>(PolicyKind::Arc { transform_threshold: 2 });
    ///
    /// // Sharded LRU over 8 shards
    /// let cache = CacheBuilder::new(100)
    ///     .build::<u64, String>(PolicyKind::ShardedLru { shards: 8 });
    /// ```
    pub fn build<K, V>(self, policy: PolicyKind) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let inner = match policy {
            PolicyKind::Lru => CacheInner::Lru(LruCache::new(self.capacity)),
            PolicyKind::Lfu { max_average } => {
                CacheInner::Lfu(LfuCache::with_max_average(self.capacity, max_average))
            }
            PolicyKind::LruK {
                history_capacity,
                k,
            } => CacheInner::LruK(LruKCache::new(self.capacity, history_capacity, k)),
            PolicyKind::Arc {
                transform_threshold,
            } => CacheInner::Arc(ArcCache::with_threshold(self.capacity, transform_threshold)),
            PolicyKind::ShardedLru { shards } => {
                CacheInner::ShardedLru(ShardedLruCache::new(self.capacity, shards))
            }
            PolicyKind::ShardedLfu {
                shards,
                max_average,
            } => CacheInner::ShardedLfu(ShardedLfuCache::with_max_average(
                self.capacity,
                shards,
                max_average,
            )),
        };

        Cache { inner }
    }
}
