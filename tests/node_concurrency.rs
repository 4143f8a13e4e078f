// ==============================================
// SHARED CACHE NODE (integration, `concurrency`)
// ==============================================
//
// A ring and a per-node cache shared by request threads.

#![cfg(feature = "concurrency")]

use std::thread;

use shardcache::prelude::*;

#[test]
fn request_threads_share_ring_and_caches() {
    let ring = ConcurrentHashRing::from(
        HashRingBuilder::new()
            .replicas(20)
            .nodes(["a", "b", "c"])
            .build(),
    );
    let caches: Vec<(String, ConcurrentByteLru<ByteView>)> = ["a", "b", "c"]
        .into_iter()
        .map(|n| (n.to_string(), ConcurrentByteLru::new(4096)))
        .collect();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let ring = ring.clone();
            let caches = caches.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    let key = format!("req-{t}-{i}");
                    let owner = ring.get(&key).unwrap();
                    let (_, cache) = caches.iter().find(|(n, _)| *n == owner).unwrap();
                    if cache.get(&key).is_none() {
                        cache.add(&key, ByteView::from(key.as_bytes()));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for (_, cache) in &caches {
        assert!(cache.used_bytes() <= 4096);
        cache.with_cache(|inner| inner.check_invariants()).unwrap();
    }
}

#[test]
fn ring_grows_while_routing() {
    let ring = ConcurrentHashRing::new(10);
    ring.add(["seed"]);

    let reader = {
        let ring = ring.clone();
        thread::spawn(move || {
            for i in 0..2_000 {
                assert!(ring.get(&format!("k{i}")).is_some());
            }
        })
    };
    for n in 0..10 {
        ring.add([format!("node{n}")]);
    }
    reader.join().unwrap();

    assert_eq!(ring.node_count(), 11);
    assert_eq!(ring.len(), 110);
}
