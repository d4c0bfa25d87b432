pub use crate::builder::{Cache, CacheBuilder, PolicyKind};
pub use crate::ds::GhostList;
pub use crate::error::{CacheError, ErrorKind};
pub use crate::policy::arc::ArcCache;
pub use crate::policy::lfu::{LfuCache, LfuCore};
pub use crate::policy::lru::{LruCache, LruCore};
pub use crate::policy::lru_k::LruKCache;
pub use crate::policy::sharded::{ShardedCache, ShardedLfuCache, ShardedLruCache};
pub use crate::traits::{CachePolicy, ConcurrentCache};
