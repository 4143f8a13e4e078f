//! Consistent hashing ring for routing keys to cache nodes.
//!
//! Each real node is placed on a `u32` ring `replicas` times. Replica `i` of
//! node `n` sits at `hash(format!("{i}{n}"))`. A key is owned by the first
//! point at or after `hash(key)`, wrapping to the lowest point when the key
//! hashes past the last one.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Key Routing Flow                                │
//! │                                                                         │
//! │   points (sorted):  [ 2 | 4 | 6 | 12 | 14 | 16 | 22 | 24 | 26 ]        │
//! │   owners:             "2" "4" "6"  "2"  "4"  "6"  "2"  "4"  "6"        │
//! │                                                                         │
//! │   get("11"): hash = 11 → first point >= 11 is 12 → owner "2"           │
//! │   get("27"): hash = 27 → past the end → wrap to index 0 → owner "2"    │
//! │                                                                         │
//! │                 0 ──► 2 ──► 4 ── ... ──► 24 ──► 26 ──┐                  │
//! │                 ▲                                     │                  │
//! │                 └────────────── wrap ─────────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//! Properties
//! ──────────
//! • Deterministic: same ring + same key → same node
//! • Balanced: more replicas → smoother spread across nodes
//! • Low churn: adding a node only takes keys for itself
//! ```
//!
//! ## Membership
//!
//! Nodes are only ever added. Adding a node that is already present places
//! another full set of `replicas` points for it; the ring does not
//! deduplicate. On a point collision the most recently added node owns the
//! point.
//!
//! ## Example Usage
//!
//! ```
//! use shardcache::ds::HashRing;
//!
//! let mut ring = HashRing::new(50);
//! assert_eq!(ring.get("user:1"), None);
//!
//! ring.add(["node1", "node2", "node3"]);
//! let owner = ring.get("user:1").unwrap();
//! assert!(["node1", "node2", "node3"].contains(&owner));
//! assert_eq!(ring.get("user:1"), Some(owner));
//! ```
//!
//! ## Performance
//!
//! - `add`: O(r·n + p log p) for `n` new nodes, `r` replicas, `p` points
//! - `get`: O(log p) with the cost of hashing the key

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::ConfigError;
use crate::traits::HashFn;

/// Replica count used by [`HashRingBuilder`](crate::builder::HashRingBuilder)
/// when none is configured.
pub const DEFAULT_REPLICAS: usize = 50;

/// CRC-32 (IEEE polynomial) checksum; the ring's default hash.
#[inline]
pub fn crc32_ieee(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Sorted ring of virtual node points.
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    points: Vec<u32>,
    owners: FxHashMap<u32, String>,
    members: BTreeSet<String>,
}

impl HashRing {
    /// Creates an empty ring hashed with CRC-32/IEEE.
    ///
    /// A ring with zero replicas never gains points and routes nothing; use
    /// [`HashRing::try_new`] to reject that configuration.
    pub fn new(replicas: usize) -> Self {
        Self::with_hash_fn(replicas, crc32_ieee)
    }

    /// Creates an empty ring with a custom hash function.
    ///
    /// # Example
    ///
    /// ```
    /// use shardcache::ds::HashRing;
    ///
    /// let mut ring = HashRing::with_hash_fn(1, |data| data.len() as u32);
    /// ring.add(["a"]); // single point at len("0a") = 2
    /// assert_eq!(ring.points(), &[2]);
    /// ```
    pub fn with_hash_fn<F>(replicas: usize, hash: F) -> Self
    where
        F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
    {
        Self::with_shared_hash(replicas, Arc::new(hash))
    }

    /// Creates an empty ring using an already shared [`HashFn`].
    pub fn with_shared_hash(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            points: Vec::new(),
            owners: FxHashMap::default(),
            members: BTreeSet::new(),
        }
    }

    /// Creates an empty CRC-32 ring, rejecting a replica count of zero.
    ///
    /// # Example
    ///
    /// ```
    /// use shardcache::ds::HashRing;
    ///
    /// assert!(HashRing::try_new(3).is_ok());
    /// let err = HashRing::try_new(0).unwrap_err();
    /// assert!(err.to_string().contains("replicas"));
    /// ```
    pub fn try_new(replicas: usize) -> Result<Self, ConfigError> {
        validate_replicas(replicas)?;
        Ok(Self::new(replicas))
    }

    /// Places `replicas` points for each node, then re-sorts the ring.
    ///
    /// An empty batch is a no-op.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.points.len();
        for node in nodes {
            let node = node.as_ref();
            let already_present = !self.members.insert(node.to_owned());
            self.points.reserve(self.replicas);
            for i in 0..self.replicas {
                let point = (self.hash)(format!("{i}{node}").as_bytes());
                self.points.push(point);
                self.owners.insert(point, node.to_owned());
            }
            debug!(
                node,
                replicas = self.replicas,
                already_present,
                "added node to ring"
            );
        }

        if self.points.len() != before {
            self.points.sort_unstable();
        }
    }

    /// Returns the node owning `key`, or `None` if the ring has no points.
    ///
    /// # Example
    ///
    /// ```
    /// use shardcache::ds::HashRing;
    ///
    /// let mut ring = HashRing::new(3);
    /// ring.add(["node1", "node2", "node3"]);
    /// let node = ring.get("some-key").unwrap();
    /// assert_eq!(ring.get("some-key"), Some(node));
    /// ```
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.points.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.points.partition_point(|&point| point < hash);
        let point = self.points[idx % self.points.len()];
        self.owners.get(&point).map(String::as_str)
    }

    /// Returns the configured replica count.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Returns the number of points on the ring.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the ring has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the sorted ring points.
    pub fn points(&self) -> &[u32] {
        &self.points
    }

    /// Returns `true` if `node` has been added.
    pub fn contains_node(&self, node: &str) -> bool {
        self.members.contains(node)
    }

    /// Returns the number of distinct nodes added.
    pub fn node_count(&self) -> usize {
        self.members.len()
    }

    /// Iterates distinct node ids in lexical order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(String::as_str)
    }
}

pub(crate) fn validate_replicas(replicas: usize) -> Result<(), ConfigError> {
    if replicas == 0 {
        return Err(ConfigError::new("replicas must be greater than zero"));
    }
    Ok(())
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("points", &self.points.len())
            .field("nodes", &self.members)
            .finish_non_exhaustive()
    }
}

impl Default for HashRing {
    /// Creates an empty CRC-32 ring with [`DEFAULT_REPLICAS`].
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS)
    }
}

/// Shared [`HashRing`] for routing from many threads.
///
/// Lookups take a read lock; membership changes take the write lock.
#[cfg(feature = "concurrency")]
#[derive(Clone)]
pub struct ConcurrentHashRing {
    inner: Arc<RwLock<HashRing>>,
}

#[cfg(feature = "concurrency")]
impl fmt::Debug for ConcurrentHashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = self.inner.read();
        f.debug_tuple("ConcurrentHashRing").field(&*ring).finish()
    }
}

#[cfg(feature = "concurrency")]
impl From<HashRing> for ConcurrentHashRing {
    fn from(ring: HashRing) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ring)),
        }
    }
}

#[cfg(feature = "concurrency")]
impl ConcurrentHashRing {
    /// Creates an empty shared CRC-32 ring.
    pub fn new(replicas: usize) -> Self {
        HashRing::new(replicas).into()
    }

    /// See [`HashRing::add`].
    pub fn add<I, S>(&self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ring = self.inner.write();
        ring.add(nodes);
    }

    /// Returns an owned copy of the node owning `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        let ring = self.inner.read();
        ring.get(key).map(str::to_owned)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().node_count()
    }

    /// Clones the current ring state.
    pub fn snapshot(&self) -> HashRing {
        self.inner.read().clone()
    }
}
