//! # Least Recently Used (LRU) Cache Engine
//!
//! Classic recency-ordered cache: a hash index over a doubly linked list,
//! O(1) for every operation. The head side of the list is most recent, the
//! tail side least recent; eviction unlinks the tail.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                         LruCache<K, V>                           │
//!   │                                                                  │
//!   │   ┌────────────────────────────────────────────────────────────┐ │
//!   │   │                Arc<Mutex<LruCore<K, V>>>                   │ │
//!   │   └────────────────────────────────────────────────────────────┘ │
//!   │                                │                                 │
//!   │                                ▼                                 │
//!   │   ┌────────────────────────────────────────────────────────────┐ │
//!   │   │                       LruCore<K, V>                        │ │
//!   │   │                                                            │ │
//!   │   │   FxHashMap<K, NonNull<Node>>                              │ │
//!   │   │      │                                                     │ │
//!   │   │      ▼                                                     │ │
//!   │   │   head ──► [A] ◄──► [B] ◄──► [C] ◄── tail                  │ │
//!   │   │          (MRU)                (LRU)                        │ │
//!   │   └────────────────────────────────────────────────────────────┘ │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Method        | Complexity | Description                              |
//! |---------------|------------|------------------------------------------|
//! | `put(k, v)`   | O(1)*      | Insert or overwrite, may evict LRU       |
//! | `get(&k)`     | O(1)       | Retrieve, moves entry to MRU position    |
//! | `remove(&k)`  | O(1)       | Unlink and erase a specific entry        |
//! | `pop_lru()`   | O(1)       | Remove and return the least recent entry |
//! | `purge()`     | O(n)       | Remove all entries                       |
//!
//! ## Key Components
//!
//! | Component      | Description                                          |
//! |----------------|------------------------------------------------------|
//! | `LruCore<K,V>` | Single-threaded core: map + raw-pointer linked list  |
//! | `LruCache<K,V>`| Thread-safe engine; one `parking_lot::Mutex` covers  |
//! |                | the whole core, cloneable shared handle              |
//!
//! ## Concurrency Model
//!
//! Every public operation on [`LruCache`] acquires the engine mutex for its
//! entire duration. `get` reorders the recency list, so reads take the same
//! exclusive lock as writes; the critical section never blocks on I/O and is
//! O(1). For read-heavy fan-out, shard the engine
//! ([`ShardedLruCache`](crate::policy::sharded::ShardedLruCache)) rather
//! than splitting this lock.
//!
//! ## Safety
//!
//! `LruCore` links nodes with `NonNull` pointers. All nodes are heap
//! allocations owned by the core: the map holds the only entry point, the
//! list holds the ordering, and both references die together on eviction,
//! `remove`, `purge`, or `Drop`. Debug builds re-validate the map/list
//! bijection after every mutation.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::lru::LruCache;
//! use evictkit::traits::CachePolicy;
//!
//! let cache = LruCache::new(2);
//! cache.put(1, "one");
//! cache.put(2, "two");
//!
//! // Touching key 1 protects it from the next eviction
//! assert_eq!(cache.get(&1), Some("one"));
//! cache.put(3, "three");
//!
//! assert_eq!(cache.get(&2), None); // evicted
//! assert_eq!(cache.get(&1), Some("one"));
//! assert_eq!(cache.get(&3), Some("three"));
//! ```

use std::fmt;
use std::hash::Hash;
use std::ptr::NonNull;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::traits::{CachePolicy, ConcurrentCache};

/// Node in the LRU linked list.
///
/// Layout keeps the linkage first for traversal locality; the key is carried
/// so eviction can erase the map entry.
#[repr(C)]
struct Node<K, V> {
    prev: Option<NonNull<Node<K, V>>>,
    next: Option<NonNull<Node<K, V>>>,
    key: K,
    value: V,
}

/// Single-threaded LRU core: hash index + raw-pointer linked list.
///
/// All operations are O(1). Thread safety is provided by the [`LruCache`]
/// wrapper; the core itself requires `&mut self` for mutation.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCore;
///
/// let mut core: LruCore<u32, String> = LruCore::new(2);
/// core.insert(1, "one".to_string());
/// core.insert(2, "two".to_string());
/// core.insert(3, "three".to_string());
///
/// assert!(!core.contains(&1)); // least recent, evicted
/// assert_eq!(core.len(), 2);
/// ```
pub struct LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    map: FxHashMap<K, NonNull<Node<K, V>>>,
    head: Option<NonNull<Node<K, V>>>,
    tail: Option<NonNull<Node<K, V>>>,
    capacity: usize,
}

// SAFETY: the raw pointers only reference heap nodes owned by this struct,
// so the core moves between threads whenever its contents do.
unsafe impl<K, V> Send for LruCore<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send,
{
}

// SAFETY: shared access never mutates through the pointers; mutation requires
// `&mut self`, which the outer mutex serializes.
unsafe impl<K, V> Sync for LruCore<K, V>
where
    K: Eq + Hash + Clone + Sync,
    V: Sync,
{
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU core with the given capacity.
    ///
    /// A capacity of 0 creates a core that accepts no entries (all inserts
    /// are no-ops).
    #[inline]
    pub fn new(capacity: usize) -> Self {
        LruCore {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            head: None,
            tail: None,
            capacity,
        }
    }

    /// Detach a node from the linked list without touching the map.
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

    /// Attach a node at the front (MRU position).
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

    /// Pop the tail node (LRU) and take ownership of it.
    #[inline(always)]
    fn pop_tail(&mut self) -> Option<Box<Node<K, V>>> {
        self.tail.map(|tail_ptr| unsafe {
            let node = Box::from_raw(tail_ptr.as_ptr());

            self.tail = node.prev;
            match self.tail {
                Some(mut t) => t.as_mut().next = None,
                None => self.head = None,
            }

            node
        })
    }

    /// Validate internal invariants (debug builds only).
    fn validate_invariants(&self) {
        #[cfg(debug_assertions)]
        {
            if self.map.is_empty() {
                debug_assert!(self.head.is_none());
                debug_assert!(self.tail.is_none());
                return;
            }

            let mut count = 0usize;
            let mut current = self.head;
            while let Some(ptr) = current {
                count += 1;
                unsafe {
                    let node = ptr.as_ref();
                    debug_assert!(self.map.contains_key(&node.key));
                    current = node.next;
                }
                if count > self.map.len() {
                    panic!("cycle detected in LRU list");
                }
            }

            debug_assert_eq!(count, self.map.len());
        }
    }

    /// Inserts or overwrites an entry, returning the previous value.
    ///
    /// An existing key is overwritten and moved to MRU. A fresh key evicts
    /// the least recent entry first when the core is full. With capacity 0
    /// this is a no-op.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&node_ptr) = self.map.get(&key) {
            let previous = unsafe {
                let node = &mut *node_ptr.as_ptr();
                std::mem::replace(&mut node.value, value)
            };

            self.detach(node_ptr);
            self.attach_front(node_ptr);
            self.validate_invariants();

            return Some(previous);
        }

        if self.map.len() >= self.capacity {
            if let Some(evicted) = self.pop_tail() {
                self.map.remove(&evicted.key);
            }
        }

        let node = Box::new(Node {
            prev: None,
            next: None,
            key: key.clone(),
            value,
        });
        let node_ptr = NonNull::from(Box::leak(node));

        self.map.insert(key, node_ptr);
        self.attach_front(node_ptr);
        self.validate_invariants();

        None
    }

    /// Looks up an entry, moving it to the MRU position on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let node_ptr = *self.map.get(key)?;

        self.detach(node_ptr);
        self.attach_front(node_ptr);
        self.validate_invariants();

        unsafe { Some(&(*node_ptr.as_ptr()).value) }
    }

    /// Reads an entry without refreshing its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let node_ptr = *self.map.get(key)?;
        unsafe { Some(&(*node_ptr.as_ptr()).value) }
    }

    /// Removes an entry by key, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let node_ptr = self.map.remove(key)?;

        self.detach(node_ptr);
        let node = unsafe { Box::from_raw(node_ptr.as_ptr()) };
        self.validate_invariants();

        Some(node.value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let node = self.pop_tail()?;
        self.map.remove(&node.key);
        self.validate_invariants();
        Some((node.key, node.value))
    }

    /// Returns `true` if the key is resident. Does not affect recency.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the core holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the configured capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        while self.pop_tail().is_some() {}
        self.map.clear();
        self.validate_invariants();
    }
}

impl<K, V> Drop for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        while self.pop_tail().is_some() {}
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

/// Thread-safe LRU cache engine.
///
/// One mutex covers the whole core; every public operation acquires it for
/// its full duration. The handle is cloneable; clones share the same
/// underlying cache.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use evictkit::policy::lru::LruCache;
/// use evictkit::traits::CachePolicy;
///
/// let cache = Arc::new(LruCache::new(100));
/// let writer = Arc::clone(&cache);
///
/// std::thread::spawn(move || {
///     writer.put(1, "from another thread");
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(cache.get(&1), Some("from another thread"));
/// ```
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<Mutex<LruCore<K, V>>>,
}

impl<K, V> Clone for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a new LRU engine with the given capacity.
    ///
    /// A capacity of 0 is legal and turns every `put` into a no-op, letting
    /// callers disable a cache path without conditionals.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LruCore::new(capacity))),
        }
    }

    /// Stores or overwrites an entry.
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().insert(key, value);
    }

    /// Retrieves a value, refreshing the entry's recency on a hit.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Reads a value without refreshing the entry's recency.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().peek(key).cloned()
    }

    /// Removes an entry by key, returning its value.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Returns `true` if the key is resident. Does not affect recency.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Removes all entries.
    pub fn purge(&self) {
        self.inner.lock().clear();
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
}

impl<K, V> CachePolicy<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        LruCache::put(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn purge(&self) {
        LruCache::purge(self)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }
}

impl<K, V> ConcurrentCache for LruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send,
{
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LruCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .finish_non_exhaustive()
    }
}
