// ==============================================
// CROSS-POLICY BEHAVIORAL LAWS (integration)
// ==============================================
//
// End-to-end traces exercising each engine through its public API. These
// span multiple modules and belong here rather than in any single source
// file.

use evictkit::prelude::*;

// ==============================================
// Overwrite idempotence (all engines)
// ==============================================

mod overwrite_idempotence {
    use super::*;

    fn assert_overwrite_idempotent<C: CachePolicy<u64, u64>>(cache: &C) {
        cache.put(1, 7);
        assert_eq!(cache.get(&1), Some(7));
        for _ in 0..5 {
            cache.put(1, 7);
        }
        assert_eq!(cache.get(&1), Some(7));
    }

    #[test]
    fn holds_for_every_policy() {
        assert_overwrite_idempotent(&LruCache::new(8));
        assert_overwrite_idempotent(&LfuCache::new(8));
        assert_overwrite_idempotent(&LruKCache::new(8, 32, 0));
        assert_overwrite_idempotent(&ArcCache::new(8));
        assert_overwrite_idempotent(&ShardedLruCache::new(8, 2));
        assert_overwrite_idempotent(&ShardedLfuCache::new(8, 2));
    }
}

// ==============================================
// Zero capacity is legal and inert
// ==============================================

mod zero_capacity {
    use super::*;

    fn assert_inert<C: CachePolicy<u64, u64>>(cache: &C) {
        cache.put(1, 1);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get_or_default(&1), 0);
    }

    #[test]
    fn puts_are_no_ops_everywhere() {
        assert_inert(&LruCache::new(0));
        assert_inert(&LfuCache::new(0));
        assert_inert(&LruKCache::new(0, 4, 1));
        assert_inert(&ArcCache::new(0));
    }
}

// ==============================================
// LRU: recency ordering
// ==============================================

mod lru {
    use super::*;

    #[test]
    fn scenario_capacity_two_trace() {
        // put(1,1), put(2,2), get(1), put(3,3), get(2)
        let cache = LruCache::new(2);
        cache.put(1, 1);
        cache.put(2, 2);
        assert_eq!(cache.get(&1), Some(1));
        cache.put(3, 3);
        assert_eq!(cache.get(&2), None);

        // surviving set after the trace: {1, 3}
        assert!(cache.contains(&1));
        assert!(cache.contains(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn filling_past_capacity_drops_the_first_insert() {
        let n = 8u64;
        let cache = LruCache::new(n as usize);
        for k in 1..=n {
            cache.put(k, k);
        }
        cache.put(n + 1, n + 1);

        assert_eq!(cache.get(&1), None);
        for k in 2..=n + 1 {
            assert_eq!(cache.get(&k), Some(k));
        }
    }

    #[test]
    fn remove_is_immediate() {
        let cache = LruCache::new(4);
        cache.put(1, 1);
        assert_eq!(cache.remove(&1), Some(1));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.remove(&1), None);
    }
}

// ==============================================
// LFU: frequency ordering and aging
// ==============================================

mod lfu {
    use super::*;

    #[test]
    fn scenario_least_frequent_is_evicted() {
        // capacity 2, max_average 10:
        // put(1,1), put(2,2), get(1), get(1), put(3,3)
        let cache = LfuCache::with_max_average(2, 10);
        cache.put(1, 1);
        cache.put(2, 2);
        assert_eq!(cache.get(&1), Some(1));
        assert_eq!(cache.get(&1), Some(1));
        cache.put(3, 3);

        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some(1));
        assert_eq!(cache.get(&3), Some(3));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn scenario_aging_bounds_a_hot_singleton() {
        // capacity 2, max_average 4: put(1,1) then nine gets. With a single
        // resident entry the average equals its frequency, so aging trips
        // every time the frequency would exceed 4.
        let cache = LfuCache::with_max_average(2, 4);
        cache.put(1, 1);

        for _ in 0..9 {
            assert_eq!(cache.get(&1), Some(1));
            let freq = cache.frequency(&1).unwrap();
            assert!(freq >= 1);
            assert!(cache.average_frequency() <= 5);
            cache.check_invariants().unwrap();
        }
        assert!(cache.frequency(&1).unwrap() < 9);
    }

    #[test]
    fn aging_lets_new_arrivals_displace_stale_hot_keys() {
        let cache = LfuCache::with_max_average(2, 3);
        cache.put(1, 1);
        for _ in 0..12 {
            cache.get(&1);
        }
        // without aging key 1 would be unreachable; with it, a modestly
        // warm newcomer can win the eviction race against the second slot
        cache.put(2, 2);
        cache.put(3, 3);
        assert!(cache.len() <= 2);
        cache.check_invariants().unwrap();
    }
}

// ==============================================
// LRU-K: admission filtering
// ==============================================

mod lru_k {
    use super::*;

    #[test]
    fn scenario_two_gets_and_two_puts() {
        // capacity 1, history 4, k = 3
        let cache = LruKCache::new(1, 4, 3);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"a"), None);
        cache.put("a", 1);
        assert_eq!(cache.len(), 0); // primary still empty

        cache.put("a", 1);
        assert_eq!(cache.get(&"a"), Some(1)); // now installed with value 1
    }

    #[test]
    fn three_observations_then_a_put_installs() {
        // k = 3, history capacity >= 3: a single put leaves the key absent;
        // after three observations the next put installs it
        let cache = LruKCache::new(4, 8, 3);
        cache.put("a", 1);
        assert!(!cache.contains(&"a"));

        assert_eq!(cache.get(&"a"), None); // observations 2 and 3
        assert_eq!(cache.get(&"a"), None);
        cache.put("a", 1);
        assert!(cache.contains(&"a"));
    }

    #[test]
    fn one_hit_wonders_never_pollute_the_primary() {
        let cache = LruKCache::new(4, 64, 2);
        for k in 0..50u64 {
            cache.put(k, k);
        }
        assert!(cache.is_empty());
        assert!(cache.history_len() <= 64);
    }
}

// ==============================================
// ARC: self-tuning capacity split
// ==============================================

mod arc {
    use super::*;

    #[test]
    fn scenario_promotion_then_ghost_shift() {
        // capacity 4, threshold 2
        let cache = ArcCache::new(4);
        for k in 1..=4u64 {
            cache.put(k, k);
        }
        // two gets promote key 1 into the frequency part
        assert_eq!(cache.get(&1), Some(1));
        assert_eq!(cache.get(&1), Some(1));

        // churn the recency part into its ghost list
        for k in 5..=8u64 {
            cache.put(k, k);
        }
        cache.check_invariants().unwrap();

        // key 1 left recency main while resident in the frequency part, so
        // this is a frequency-part write, no capacity shift
        cache.put(1, 100);
        assert_eq!(cache.recency_capacity(), 4);
        assert_eq!(cache.frequency_capacity(), 4);
        assert_eq!(cache.get(&1), Some(100));

        // key 2 is in the recency ghost: one unit shifts toward recency
        cache.put(2, 200);
        assert_eq!(cache.recency_capacity(), 5);
        assert_eq!(cache.frequency_capacity(), 3);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn ghost_hit_strictly_grows_the_touched_side() {
        let cache = ArcCache::new(2);
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3); // ghosts 1

        let before_r = cache.recency_capacity();
        let before_f = cache.frequency_capacity();
        cache.put(1, 1); // recency ghost hit
        assert_eq!(cache.recency_capacity(), before_r + 1);
        assert_eq!(cache.frequency_capacity(), before_f - 1);
    }

    #[test]
    fn residency_respects_the_combined_budget() {
        let cache = ArcCache::new(8);
        for k in 0..1000u64 {
            cache.put(k, k);
            if k % 3 == 0 {
                cache.get(&(k / 2));
            }
        }
        assert!(cache.len() <= cache.capacity());
        cache.check_invariants().unwrap();
    }
}
