pub mod hash_ring;
pub mod recency_list;

#[cfg(feature = "concurrency")]
pub use hash_ring::ConcurrentHashRing;
pub use hash_ring::{DEFAULT_REPLICAS, HashRing, crc32_ieee};
pub use recency_list::{RecencyList, SlotId};
