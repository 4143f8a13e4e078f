//! shardcache: the building blocks of a sharded in-memory cache.
//!
//! - [`policy::byte_lru::ByteLru`]: LRU cache bounded by the byte size of
//!   its entries, used inside a single cache node.
//! - [`ds::HashRing`]: consistent hashing ring that routes a key to the
//!   node responsible for it.
//!
//! The two are independent; a cache node service composes them.
//!
//! ```
//! use shardcache::prelude::*;
//!
//! let ring = HashRingBuilder::new().replicas(3).nodes(["a", "b"]).build();
//! let mut local: ByteLru<ByteView> = ByteLru::new(1 << 20);
//!
//! let owner = ring.get("user:42").unwrap();
//! if owner == "a" {
//!     local.add("user:42", ByteView::from("payload"));
//! }
//! ```
//!
//! Enable the `concurrency` feature for `parking_lot`-guarded wrappers of
//! both components.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;
pub mod value;
