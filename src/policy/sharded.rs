//! # Sharded Cache Wrapper
//!
//! Hash-partitioned fan-out over N independent engine instances. Every
//! operation routes to shard `hash(key) % N`; shards never share a lock, so
//! operations on distinct shards proceed fully in parallel. With a
//! well-distributed hash the hit rate is essentially unchanged while lock
//! contention drops linearly. Sharding is this library's scaling lever,
//! not finer-grained locking inside an engine.
//!
//! ```text
//!   key ──► FxHasher ──► hash % N
//!
//!   ┌─────────┬─────────┬─────────┬─────────┐
//!   │ engine 0│ engine 1│ engine 2│ engine 3│   (each with its own mutex)
//!   └─────────┴─────────┴─────────┴─────────┘
//! ```
//!
//! Routing hashes with the same `FxHasher` the engines index with, so a key
//! is pinned to one shard for its whole lifetime. Per-shard capacity is
//! `ceil(total_capacity / N)`. A shard count of 0 resolves to the machine's
//! available parallelism.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::sharded::ShardedLruCache;
//! use evictkit::traits::CachePolicy;
//!
//! let cache: ShardedLruCache<u64, String> = ShardedLruCache::new(1024, 8);
//! cache.put(1, "one".to_string());
//! assert_eq!(cache.get(&1), Some("one".to_string()));
//! assert_eq!(cache.shard_count(), 8);
//! ```

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::traits::{CachePolicy, ConcurrentCache};

/// Hash-partitioned wrapper over independent engine instances.
///
/// The wrapper itself holds no lock: each shard is a complete, thread-safe
/// engine, and routing is a pure function of the key. Use the
/// [`ShardedLruCache`] / [`ShardedLfuCache`] aliases for the concrete
/// constructors.
#[derive(Debug)]
pub struct ShardedCache<C> {
    shards: Vec<C>,
}

impl<C> ShardedCache<C> {
    /// Builds a sharded cache from an engine constructor.
    ///
    /// `build` is called once per shard with the per-shard capacity
    /// (`ceil(total_capacity / N)`). A `shard_count` of 0 resolves to the
    /// machine's available parallelism.
    pub fn with_shards(
        total_capacity: usize,
        shard_count: usize,
        build: impl Fn(usize) -> C,
    ) -> Self {
        let count = resolve_shard_count(shard_count);
        let per_shard = total_capacity.div_ceil(count);
        let shards = (0..count).map(|_| build(per_shard)).collect();
        Self { shards }
    }

    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_for<K: Hash>(&self, key: &K) -> &C {
        &self.shards[route_key(key, self.shards.len())]
    }
}

impl<K, V, C> CachePolicy<K, V> for ShardedCache<C>
where
    K: Hash,
    V: Clone,
    C: CachePolicy<K, V>,
{
    fn put(&self, key: K, value: V) {
        self.shard_for(&key).put(key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        self.shard_for(key).get(key)
    }

    fn purge(&self) {
        for shard in &self.shards {
            shard.purge();
        }
    }

    fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }

    fn capacity(&self) -> usize {
        self.shards.iter().map(|shard| shard.capacity()).sum()
    }
}

impl<C: Send + Sync> ConcurrentCache for ShardedCache<C> {}

/// Sharded LRU: N independent [`LruCache`] engines.
pub type ShardedLruCache<K, V> = ShardedCache<LruCache<K, V>>;

impl<K, V> ShardedCache<LruCache<K, V>>
where
    K: Eq + Hash + Clone,
{
    /// Creates a sharded LRU with `ceil(total_capacity / N)` entries per
    /// shard. A `shard_count` of 0 resolves to available parallelism.
    pub fn new(total_capacity: usize, shard_count: usize) -> Self {
        Self::with_shards(total_capacity, shard_count, LruCache::new)
    }
}

/// Sharded LFU: N independent [`LfuCache`] engines.
pub type ShardedLfuCache<K, V> = ShardedCache<LfuCache<K, V>>;

impl<K, V> ShardedCache<LfuCache<K, V>>
where
    K: Eq + Hash + Clone,
{
    /// Creates a sharded LFU with the default aging threshold.
    pub fn new(total_capacity: usize, shard_count: usize) -> Self {
        Self::with_shards(total_capacity, shard_count, LfuCache::new)
    }

    /// Creates a sharded LFU with an explicit aging threshold.
    ///
    /// # Panics
    ///
    /// Panics if `max_average` is 0.
    pub fn with_max_average(total_capacity: usize, shard_count: usize, max_average: u64) -> Self {
        Self::with_shards(total_capacity, shard_count, |capacity| {
            LfuCache::with_max_average(capacity, max_average)
        })
    }
}

/// Maps a key to its home shard. Stable for the lifetime of the wrapper,
/// since the shard count never changes after construction.
fn route_key<K: Hash>(key: &K, shards: usize) -> usize {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    hasher.finish() as usize % shards
}

fn resolve_shard_count(requested: usize) -> usize {
    if requested > 0 {
        requested
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}
