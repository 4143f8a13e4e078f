//! Routes keys over a consistent hash ring and shows how few move when a
//! node joins.
//!
//! Run with: `cargo run --example basic_hash_ring`

use std::collections::BTreeMap;

use shardcache::builder::HashRingBuilder;

fn main() {
    let mut ring = HashRingBuilder::new()
        .nodes(["cache-a:8001", "cache-b:8002", "cache-c:8003"])
        .build();
    println!("{} nodes, {} points", ring.node_count(), ring.len());

    let keys: Vec<String> = (0..10_000).map(|i| format!("user:{i}")).collect();
    let before: Vec<String> = keys
        .iter()
        .filter_map(|k| ring.get(k).map(str::to_string))
        .collect();

    let mut share: BTreeMap<&str, usize> = BTreeMap::new();
    for node in &before {
        *share.entry(node.as_str()).or_default() += 1;
    }
    for (node, count) in &share {
        println!("  {node:<14} {count:>5} keys");
    }

    ring.add(["cache-d:8004"]);
    let moved = keys
        .iter()
        .zip(&before)
        .filter(|(k, old)| ring.get(k) != Some(old.as_str()))
        .count();
    println!(
        "after adding cache-d: {moved} of {} keys moved ({:.1}%)",
        keys.len(),
        100.0 * moved as f64 / keys.len() as f64
    );
}
