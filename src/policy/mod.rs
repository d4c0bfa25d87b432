//! Cache eviction policy engines.
//!
//! | Policy | File         | Best For                          | Weakness              |
//! |--------|--------------|-----------------------------------|-----------------------|
//! | LRU    | `lru.rs`     | Temporal locality                 | One-time scan floods  |
//! | LFU    | `lfu.rs`     | Stable hot spots                  | Needs aging to adapt  |
//! | LRU-K  | `lru_k.rs`   | Scan resistance via admission     | Warm-up latency       |
//! | ARC    | `arc.rs`     | Unknown/shifting workloads        | Ghost-list overhead   |
//! | Shard  | `sharded.rs` | Concurrent throughput             | Per-shard imbalance   |

pub mod arc;
pub mod lfu;
pub mod lru;
pub mod lru_k;
pub mod sharded;
