// ==============================================
// LATENCY SMOKE TESTS (integration)
// ==============================================
//
// Coarse upper bounds that catch accidental O(n) paths, not benchmarks.
// Precise numbers come from `cargo bench`.

use std::time::{Duration, Instant};

use shardcache::prelude::*;

fn measure_time<F, R>(operation: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = operation();
    (result, start.elapsed())
}

fn filled_cache(entries: usize) -> ByteLru<ByteView> {
    let payload = ByteView::from(vec![7u8; 32]);
    let mut cache = ByteLru::new(0);
    for i in 0..entries {
        cache.add(&format!("key:{i}"), payload.clone());
    }
    cache
}

mod cache_latency {
    use super::*;

    #[test]
    fn get_latency() {
        let mut cache = filled_cache(1_000);
        let keys: Vec<String> = (0..1_000).map(|i| format!("key:{i}")).collect();

        let iterations = 10_000u32;
        let (_, duration) = measure_time(|| {
            for i in 0..iterations as usize {
                cache.get(&keys[i % keys.len()]);
            }
        });

        let avg = duration / iterations;
        println!("Average get latency: {avg:?}");
        assert!(avg < Duration::from_micros(10), "get too slow: {avg:?}");
    }

    #[test]
    fn get_does_not_scale_with_size() {
        let mut timings = Vec::new();
        for size in [100usize, 10_000] {
            let mut cache = filled_cache(size);
            let keys: Vec<String> = (0..size).map(|i| format!("key:{i}")).collect();
            let (_, duration) = measure_time(|| {
                for i in 0..5_000 {
                    cache.get(&keys[(i * 31) % size]);
                }
            });
            timings.push(duration);
        }
        // a linear scan would be ~100x slower on the larger cache
        assert!(
            timings[1] < timings[0] * 20 + Duration::from_millis(5),
            "lookup scaled with size: {timings:?}"
        );
    }

    #[test]
    fn add_into_full_cache_latency() {
        let payload = ByteView::from(vec![1u8; 64]);
        let mut cache = ByteLru::new(64 * 1_000);
        for i in 0..2_000 {
            cache.add(&format!("warm:{i}"), payload.clone());
        }

        let keys: Vec<String> = (0..10_000).map(|i| format!("churn:{i}")).collect();
        let (_, duration) = measure_time(|| {
            for key in &keys {
                cache.add(key, payload.clone());
            }
        });

        let avg = duration / keys.len() as u32;
        println!("Average evicting add latency: {avg:?}");
        assert!(avg < Duration::from_micros(20), "add too slow: {avg:?}");
        assert!(cache.used_bytes() <= 64 * 1_000);
    }
}

mod ring_latency {
    use super::*;

    #[test]
    fn get_latency() {
        let nodes: Vec<String> = (0..32).map(|i| format!("node{i}")).collect();
        let ring = HashRingBuilder::new().nodes(nodes).build();
        let keys: Vec<String> = (0..1_000).map(|i| format!("key:{i}")).collect();

        let iterations = 10_000u32;
        let (hits, duration) = measure_time(|| {
            (0..iterations as usize)
                .filter(|i| ring.get(&keys[i % keys.len()]).is_some())
                .count()
        });

        assert_eq!(hits, iterations as usize);
        let avg = duration / iterations;
        println!("Average ring lookup latency: {avg:?}");
        assert!(avg < Duration::from_micros(10), "lookup too slow: {avg:?}");
    }
}
