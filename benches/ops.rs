//! Micro-operation benchmarks for all cache engines.
//!
//! Run with: `cargo bench --bench ops`
//!
//! Measures per-operation latency for get and put across the engines under
//! identical conditions, plus a skewed mixed workload.

use std::hint::black_box;
use std::time::Instant;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use evictkit::policy::arc::ArcCache;
use evictkit::policy::lfu::LfuCache;
use evictkit::policy::lru::LruCache;
use evictkit::policy::lru_k::LruKCache;
use evictkit::policy::sharded::ShardedLruCache;
use evictkit::traits::CachePolicy;

const CAPACITY: usize = 16_384;
const OPS: u64 = 100_000;

fn warm<C: CachePolicy<u64, u64>>(cache: &C) {
    for i in 0..CAPACITY as u64 {
        cache.put(i, i);
    }
}

fn run_get_hits<C: CachePolicy<u64, u64>>(cache: &C, iters: u64) -> std::time::Duration {
    warm(cache);
    let start = Instant::now();
    for _ in 0..iters {
        for i in 0..OPS {
            let key = i % (CAPACITY as u64);
            black_box(cache.get(&key));
        }
    }
    start.elapsed()
}

fn run_put_churn<C: CachePolicy<u64, u64>>(cache: &C, iters: u64) -> std::time::Duration {
    warm(cache);
    let start = Instant::now();
    for _ in 0..iters {
        for i in 0..OPS {
            // half the keys overwrite residents, half force evictions
            cache.put(i * 7 % (2 * CAPACITY as u64), i);
        }
    }
    start.elapsed()
}

// ============================================================================
// Get Hit Latency (ns/op)
// ============================================================================

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit_ns");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("lru", |b| {
        b.iter_custom(|iters| run_get_hits(&LruCache::new(CAPACITY), iters))
    });
    group.bench_function("lfu", |b| {
        b.iter_custom(|iters| run_get_hits(&LfuCache::new(CAPACITY), iters))
    });
    group.bench_function("lru_k", |b| {
        b.iter_custom(|iters| run_get_hits(&LruKCache::new(CAPACITY, CAPACITY, 0), iters))
    });
    group.bench_function("arc", |b| {
        b.iter_custom(|iters| run_get_hits(&ArcCache::new(CAPACITY), iters))
    });
    group.bench_function("sharded_lru_8", |b| {
        b.iter_custom(|iters| run_get_hits(&ShardedLruCache::new(CAPACITY, 8), iters))
    });

    group.finish();
}

// ============================================================================
// Put Latency, overwrite + eviction mix (ns/op)
// ============================================================================

fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_ns");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("lru", |b| {
        b.iter_custom(|iters| run_put_churn(&LruCache::new(CAPACITY), iters))
    });
    group.bench_function("lfu", |b| {
        b.iter_custom(|iters| run_put_churn(&LfuCache::new(CAPACITY), iters))
    });
    group.bench_function("lru_k", |b| {
        b.iter_custom(|iters| run_put_churn(&LruKCache::new(CAPACITY, CAPACITY, 2), iters))
    });
    group.bench_function("arc", |b| {
        b.iter_custom(|iters| run_put_churn(&ArcCache::new(CAPACITY), iters))
    });
    group.bench_function("sharded_lru_8", |b| {
        b.iter_custom(|iters| run_put_churn(&ShardedLruCache::new(CAPACITY, 8), iters))
    });

    group.finish();
}

// ============================================================================
// Skewed mixed workload: 90% gets, 10% puts over a hot-biased key stream
// ============================================================================

fn bench_skewed_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("skewed_mix_ns");
    group.throughput(Throughput::Elements(OPS));

    fn run<C: CachePolicy<u64, u64>>(cache: &C, iters: u64) -> std::time::Duration {
        warm(cache);
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let keys: Vec<u64> = (0..OPS)
            .map(|_| {
                if rng.random_range(0..10u32) < 8 {
                    rng.random_range(0..(CAPACITY as u64 / 16)) // hot set
                } else {
                    rng.random_range(0..(4 * CAPACITY as u64)) // long tail
                }
            })
            .collect();

        let start = Instant::now();
        for _ in 0..iters {
            for (i, &key) in keys.iter().enumerate() {
                if i % 10 == 0 {
                    cache.put(key, key);
                } else {
                    black_box(cache.get(&key));
                }
            }
        }
        start.elapsed()
    }

    group.bench_function("lru", |b| {
        b.iter_custom(|iters| run(&LruCache::new(CAPACITY), iters))
    });
    group.bench_function("lfu", |b| {
        b.iter_custom(|iters| run(&LfuCache::new(CAPACITY), iters))
    });
    group.bench_function("arc", |b| {
        b.iter_custom(|iters| run(&ArcCache::new(CAPACITY), iters))
    });

    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_put, bench_skewed_mix);
criterion_main!(benches);
