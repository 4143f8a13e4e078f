//! Several request threads share one ring and a cache per node.
//!
//! Run with: `cargo run --example concurrent_node --features concurrency`

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use shardcache::ds::ConcurrentHashRing;
use shardcache::policy::byte_lru::ConcurrentByteLru;
use shardcache::value::ByteView;

const NODES: [&str; 3] = ["node1", "node2", "node3"];

fn main() {
    let ring = ConcurrentHashRing::new(50);
    ring.add(NODES);

    let caches: Arc<BTreeMap<String, ConcurrentByteLru<ByteView>>> = Arc::new(
        NODES
            .iter()
            .map(|n| (n.to_string(), ConcurrentByteLru::new(16 << 10)))
            .collect(),
    );

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let ring = ring.clone();
            let caches = Arc::clone(&caches);
            thread::spawn(move || {
                let mut hits = 0usize;
                for i in 0..2_000 {
                    let key = format!("item:{}", (i * 7 + worker) % 600);
                    let Some(owner) = ring.get(&key) else {
                        continue;
                    };
                    let cache = &caches[&owner];
                    if cache.get(&key).is_some() {
                        hits += 1;
                    } else {
                        cache.add(&key, ByteView::from(format!("payload for {key}")));
                    }
                }
                hits
            })
        })
        .collect();

    let hits: usize = workers.into_iter().filter_map(|w| w.join().ok()).sum();
    println!("hits across workers: {hits}");
    for (node, cache) in caches.iter() {
        println!(
            "  {node}: {} entries, {} bytes",
            cache.len(),
            cache.used_bytes()
        );
    }
}
