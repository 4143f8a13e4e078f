pub use crate::builder::{ByteLruBuilder, HashRingBuilder};
#[cfg(feature = "concurrency")]
pub use crate::ds::ConcurrentHashRing;
pub use crate::ds::{DEFAULT_REPLICAS, HashRing, RecencyList, SlotId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "concurrency")]
pub use crate::policy::byte_lru::ConcurrentByteLru;
pub use crate::policy::byte_lru::{ByteLru, EvictionCallback};
pub use crate::traits::{ByteSized, HashFn};
pub use crate::value::ByteView;
