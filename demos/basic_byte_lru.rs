//! Walks a byte-budgeted cache through inserts, reads, and evictions.
//!
//! Run with: `cargo run --example basic_byte_lru`

use shardcache::builder::ByteLruBuilder;
use shardcache::value::ByteView;

fn main() {
    let mut cache = ByteLruBuilder::new()
        .capacity_bytes(24)
        .on_evicted(|key: &str, value: &ByteView| {
            println!("  evicted {key} ({} bytes)", key.len() + value.len());
        })
        .build();

    println!("budget: {} bytes", cache.capacity_bytes());
    for (key, value) in [("Tom", "630"), ("Jack", "589"), ("Sam", "567")] {
        cache.add(key, ByteView::from(value));
        println!("add {key:<5} used={:>2} entries={}", cache.used_bytes(), cache.len());
    }

    // Touching Tom makes Jack the oldest entry.
    if let Some(score) = cache.get("Tom") {
        println!("get Tom   -> {score}");
    }

    println!("add Alexandra");
    cache.add("Alexandra", ByteView::from("701"));

    let order: Vec<&str> = cache.keys().collect();
    println!("recency (newest first): {order:?}");
    println!("used={} entries={}", cache.used_bytes(), cache.len());
}
