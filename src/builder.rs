//! Builders for configuring a cache node's eviction cache and its ring.
//!
//! Both components can be constructed directly; the builders gather the
//! optional settings in one place and fill in defaults.
//!
//! | Builder            | Setting          | Default            |
//! |--------------------|------------------|--------------------|
//! | `ByteLruBuilder`   | `capacity_bytes` | 0 (unbounded)      |
//! |                    | `on_evicted`     | none               |
//! |                    | `reserve`        | 0 entries          |
//! | `HashRingBuilder`  | `replicas`       | [`DEFAULT_REPLICAS`] |
//! |                    | `hash`           | CRC-32/IEEE        |
//! |                    | `nodes`          | none               |
//!
//! ## Example
//!
//! ```rust
//! use shardcache::builder::{ByteLruBuilder, HashRingBuilder};
//! use shardcache::value::ByteView;
//!
//! let mut cache = ByteLruBuilder::<ByteView>::new()
//!     .capacity_bytes(2 << 10)
//!     .build();
//! cache.add("Tom", ByteView::from("630"));
//! assert_eq!(cache.get("Tom").map(|v| v.to_string()), Some("630".to_string()));
//!
//! let ring = HashRingBuilder::new()
//!     .replicas(3)
//!     .nodes(["node1", "node2"])
//!     .try_build()
//!     .unwrap();
//! assert!(ring.get("Tom").is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::ds::hash_ring::{DEFAULT_REPLICAS, HashRing, validate_replicas};
use crate::error::ConfigError;
use crate::policy::byte_lru::{ByteLru, EvictionCallback};
use crate::traits::{ByteSized, HashFn};

/// Builder for [`ByteLru`].
pub struct ByteLruBuilder<V> {
    capacity_bytes: usize,
    reserve: usize,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V> ByteLruBuilder<V>
where
    V: ByteSized,
{
    /// Starts an unbounded configuration with no callback.
    pub fn new() -> Self {
        Self {
            capacity_bytes: 0,
            reserve: 0,
            on_evicted: None,
        }
    }

    /// Sets the byte budget; 0 disables eviction.
    pub fn capacity_bytes(mut self, capacity_bytes: usize) -> Self {
        self.capacity_bytes = capacity_bytes;
        self
    }

    /// Pre-allocates room for `entries` entries.
    pub fn reserve(mut self, entries: usize) -> Self {
        self.reserve = entries;
        self
    }

    /// Registers a callback for every evicted entry.
    pub fn on_evicted<F>(mut self, on_evicted: F) -> Self
    where
        F: FnMut(&str, &V) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(on_evicted));
        self
    }

    /// Builds the cache. Every configuration is valid.
    pub fn build(self) -> ByteLru<V> {
        ByteLru::from_parts(self.capacity_bytes, self.reserve, self.on_evicted)
    }
}

impl<V> Default for ByteLruBuilder<V>
where
    V: ByteSized,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for ByteLruBuilder<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteLruBuilder")
            .field("capacity_bytes", &self.capacity_bytes)
            .field("reserve", &self.reserve)
            .field("on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}

/// Builder for [`HashRing`].
#[derive(Clone)]
pub struct HashRingBuilder {
    replicas: usize,
    hash: Option<HashFn>,
    nodes: Vec<String>,
}

impl HashRingBuilder {
    /// Starts a CRC-32 configuration with [`DEFAULT_REPLICAS`] and no nodes.
    pub fn new() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            hash: None,
            nodes: Vec::new(),
        }
    }

    /// Sets the number of virtual points per node.
    pub fn replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Replaces the default CRC-32 hash.
    ///
    /// # Example
    ///
    /// ```
    /// use shardcache::builder::HashRingBuilder;
    ///
    /// let ring = HashRingBuilder::new()
    ///     .replicas(1)
    ///     .hash(|data| data.len() as u32)
    ///     .nodes(["ab"])
    ///     .build();
    /// assert_eq!(ring.points(), &[3]);
    /// ```
    pub fn hash<F>(mut self, hash: F) -> Self
    where
        F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
    {
        self.hash = Some(Arc::new(hash));
        self
    }

    /// Queues nodes to add once the ring is built.
    pub fn nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Builds the ring without validating the replica count.
    pub fn build(self) -> HashRing {
        let mut ring = match self.hash {
            Some(hash) => HashRing::with_shared_hash(self.replicas, hash),
            None => HashRing::new(self.replicas),
        };
        ring.add(&self.nodes);
        ring
    }

    /// Builds the ring, rejecting a replica count of zero.
    pub fn try_build(self) -> Result<HashRing, ConfigError> {
        validate_replicas(self.replicas)?;
        Ok(self.build())
    }
}

impl Default for HashRingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HashRingBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRingBuilder")
            .field("replicas", &self.replicas)
            .field("custom_hash", &self.hash.is_some())
            .field("nodes", &self.nodes)
            .finish()
    }
}
