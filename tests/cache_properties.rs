// ==============================================
// EVICTION CACHE PROPERTIES (integration)
// ==============================================
//
// Behavior of ByteLru observed only through its public API, using ByteView
// payloads the way a cache node stores them.

use std::sync::{Arc, Mutex};

use shardcache::prelude::*;

fn view(len: usize) -> ByteView {
    ByteView::from(vec![b'x'; len])
}

fn sum_of_entries(cache: &ByteLru<ByteView>) -> usize {
    cache.iter().map(|(k, v)| k.len() + v.len()).sum()
}

mod capacity {
    use super::*;

    #[test]
    fn budget_holds_after_every_add() {
        let mut cache = ByteLru::new(100);
        for i in 0..500usize {
            cache.add(&format!("key-{}", i % 37), view(i % 41));
            assert!(cache.used_bytes() <= 100, "after add #{i}");
            assert_eq!(cache.used_bytes(), sum_of_entries(&cache));
        }
        cache.check_invariants().unwrap();
    }

    #[test]
    fn unbounded_cache_keeps_everything() {
        let mut cache = ByteLru::new(0);
        for i in 0..200 {
            cache.add(&i.to_string(), view(128));
        }
        assert_eq!(cache.len(), 200);
        assert_eq!(cache.used_bytes(), sum_of_entries(&cache));
    }
}

mod recency {
    use super::*;

    #[test]
    fn a_is_evicted_first() {
        // each entry costs 1 + 3 bytes
        let mut cache = ByteLru::new(12);
        cache.add("A", view(3));
        cache.add("B", view(3));
        cache.add("C", view(3));
        cache.add("D", view(3));

        assert!(cache.get("A").is_none());
        assert!(cache.get("B").is_some());
    }

    #[test]
    fn read_entry_is_not_next_victim() {
        let mut cache = ByteLru::new(12);
        cache.add("A", view(3));
        cache.add("B", view(3));
        cache.add("C", view(3));
        assert!(cache.get("A").is_some());

        let (victim, _) = cache.remove_oldest().unwrap();
        assert_eq!(victim, "B");
        assert!(cache.contains("A"));
    }

    #[test]
    fn single_entry_is_evicted_when_it_is_all_there_is() {
        let mut cache = ByteLru::new(12);
        cache.add("A", view(3));
        cache.get("A");
        assert_eq!(cache.remove_oldest().map(|(k, _)| k), Some("A".to_string()));
        assert!(cache.is_empty());
    }
}

mod scenario {
    use super::*;

    #[test]
    fn capacity_eight_walkthrough() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let mut cache = ByteLruBuilder::new()
            .capacity_bytes(8)
            .on_evicted(move |key: &str, value: &ByteView| {
                sink.lock().unwrap().push((key.to_string(), value.to_string()));
            })
            .build();

        cache.add("k1", ByteView::from("v1"));
        cache.add("k2", ByteView::from("v2"));
        assert_eq!(cache.used_bytes(), 8);
        assert!(evicted.lock().unwrap().is_empty());

        cache.add("k3", ByteView::from("v3"));
        assert_eq!(cache.used_bytes(), 8);
        assert!(cache.get("k1").is_none());
        assert_eq!(
            *evicted.lock().unwrap(),
            vec![("k1".to_string(), "v1".to_string())]
        );
    }

    #[test]
    fn cached_bytes_cannot_be_mutated_through_reads() {
        let mut cache = ByteLru::new(0);
        cache.add("k", ByteView::from("abc"));

        let mut copy = cache.get("k").unwrap().byte_slice();
        copy[0] = b'z';
        assert_eq!(cache.get("k").unwrap().to_string(), "abc");
    }
}
