//! Byte-budgeted LRU cache.
//!
//! [`ByteLru`] maps `String` keys to [`ByteSized`] values and keeps the total
//! footprint of all entries (key bytes plus value bytes) under a configured
//! budget by evicting the least recently used entries.
//!
//! ## Architecture
//!
//! ```text
//!   index: FxHashMap<String, SlotId>          order: RecencyList<Entry<V>>
//!   ┌──────────┬────────┐
//!   │ "k3"     │ slot 2 │ ──────────►  head ─► [2: k3] ◄─► [1: k2] ◄─► [0: k1] ◄── tail
//!   │ "k2"     │ slot 1 │                       MRU                        LRU
//!   │ "k1"     │ slot 0 │
//!   └──────────┴────────┘
//!
//!   used_bytes = Σ (key.len() + value.byte_len())      capacity_bytes = 0 → unbounded
//! ```
//!
//! ## Operations
//!
//! | Operation         | Effect on order        | Effect on bytes            |
//! |-------------------|------------------------|----------------------------|
//! | `get`             | hit moves entry to MRU | none                       |
//! | `add` (new key)   | pushes entry at MRU    | `+ key.len() + byte_len()` |
//! | `add` (existing)  | moves entry to MRU     | `+ new - old` value size   |
//! | `remove_oldest`   | pops the LRU entry     | `- key.len() - byte_len()` |
//!
//! After every `add`, entries are popped from the LRU end while
//! `capacity_bytes != 0 && used_bytes > capacity_bytes`. A single value that
//! is larger than the whole budget therefore evicts everything, itself
//! included.
//!
//! ## Eviction Callback
//!
//! An optional callback observes each entry removed by `remove_oldest`
//! (including evictions triggered by `add`). It runs after the entry has been
//! unlinked and its bytes released, so the cache is already consistent when
//! the callback sees the key and value. Overwriting a key with `add` does
//! not invoke the callback.
//!
//! The callback must not call back into the cache that is evicting. It only
//! receives borrows of the entry, but a callback that captures a shared
//! handle to its own cache (an `Arc<Mutex<ByteLru<_>>>` or a
//! `ConcurrentByteLru` clone) deadlocks, because the eviction runs while
//! that lock is held and `parking_lot::Mutex` is not reentrant. Handing the
//! entry to a *different* cache is fine.
//!
//! ## Example Usage
//!
//! ```
//! use shardcache::policy::byte_lru::ByteLru;
//!
//! // "k1" + "v1" = 4 bytes per entry
//! let mut cache: ByteLru<String> = ByteLru::new(8);
//! cache.add("k1", "v1".to_string());
//! cache.add("k2", "v2".to_string());
//! assert_eq!(cache.used_bytes(), 8);
//!
//! cache.add("k3", "v3".to_string());
//! assert!(cache.get("k1").is_none());
//! assert_eq!(cache.len(), 2);
//! ```
//!
//! ## Thread Safety
//!
//! - `ByteLru`: **NOT thread-safe**. `get` rewrites the recency order, so
//!   even lookups need exclusive access.
//! - `ConcurrentByteLru`: **Thread-safe** via a single `parking_lot::Mutex`
//!   (feature `concurrency`).

use std::fmt;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::recency_list::{RecencyList, SlotId};
use crate::error::InvariantError;
use crate::traits::ByteSized;

/// Callback invoked with each evicted `(key, value)` pair.
pub type EvictionCallback<V> = Box<dyn FnMut(&str, &V) + Send>;

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    // bytes this entry contributes to `used_bytes`
    charge: usize,
}

/// LRU cache bounded by the total byte size of its entries.
///
/// A `capacity_bytes` of 0 disables eviction entirely.
pub struct ByteLru<V> {
    index: FxHashMap<String, SlotId>,
    order: RecencyList<Entry<V>>,
    used_bytes: usize,
    capacity_bytes: usize,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V> ByteLru<V>
where
    V: ByteSized,
{
    /// Creates an empty cache with the given byte budget and no callback.
    ///
    /// # Example
    ///
    /// ```
    /// use shardcache::policy::byte_lru::ByteLru;
    ///
    /// let cache: ByteLru<Vec<u8>> = ByteLru::new(1024);
    /// assert_eq!(cache.capacity_bytes(), 1024);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity_bytes: usize) -> Self {
        Self::from_parts(capacity_bytes, 0, None)
    }

    /// Creates an empty cache that reports every eviction to `on_evicted`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::{Arc, Mutex};
    /// use shardcache::policy::byte_lru::ByteLru;
    ///
    /// let evicted = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&evicted);
    /// let mut cache = ByteLru::with_eviction_callback(10, move |key: &str, _: &String| {
    ///     sink.lock().unwrap().push(key.to_string());
    /// });
    ///
    /// cache.add("key1", "123456".to_string());
    /// cache.add("k2", "k2".to_string());
    /// cache.add("k3", "k3".to_string());
    /// assert_eq!(*evicted.lock().unwrap(), vec!["key1".to_string()]);
    /// ```
    pub fn with_eviction_callback<F>(capacity_bytes: usize, on_evicted: F) -> Self
    where
        F: FnMut(&str, &V) + Send + 'static,
    {
        Self::from_parts(capacity_bytes, 0, Some(Box::new(on_evicted)))
    }

    pub(crate) fn from_parts(
        capacity_bytes: usize,
        reserve_entries: usize,
        on_evicted: Option<EvictionCallback<V>>,
    ) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(reserve_entries, Default::default()),
            order: RecencyList::with_capacity(reserve_entries),
            used_bytes: 0,
            capacity_bytes,
            on_evicted,
        }
    }

    /// Returns the number of entries held.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the summed footprint of all entries.
    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Returns the byte budget; 0 means unbounded.
    #[inline]
    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    /// Returns `true` if `key` is cached. Does not touch the recency order.
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Looks up `key` and marks it as the most recently used entry.
    ///
    /// A miss has no side effects.
    ///
    /// # Example
    ///
    /// ```
    /// use shardcache::policy::byte_lru::ByteLru;
    ///
    /// let mut cache: ByteLru<String> = ByteLru::new(0);
    /// cache.add("key1", "1234".to_string());
    /// assert_eq!(cache.get("key1").map(String::as_str), Some("1234"));
    /// assert!(cache.get("key2").is_none());
    /// ```
    #[inline]
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.order.move_to_front(id);
        self.order.get(id).map(|entry| &entry.value)
    }

    /// Looks up `key` without changing its recency.
    #[inline]
    pub fn peek(&self, key: &str) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.order.get(id).map(|entry| &entry.value)
    }

    /// Returns the entry that `remove_oldest` would evict next.
    pub fn peek_oldest(&self) -> Option<(&str, &V)> {
        self.order
            .back()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Inserts or replaces `key`, marks it most recently used, then evicts
    /// from the LRU end until the byte budget holds again.
    ///
    /// Returns the replaced value when `key` was already present. The
    /// eviction callback is not invoked for that value.
    ///
    /// # Example
    ///
    /// ```
    /// use shardcache::policy::byte_lru::ByteLru;
    ///
    /// let mut cache: ByteLru<String> = ByteLru::new(0);
    /// assert_eq!(cache.add("key", "1".to_string()), None);
    /// assert_eq!(cache.add("key", "111".to_string()), Some("1".to_string()));
    /// assert_eq!(cache.used_bytes(), "key".len() + "111".len());
    /// ```
    pub fn add(&mut self, key: &str, value: V) -> Option<V> {
        let previous = match self.index.get(key).copied() {
            Some(id) => self.replace(id, value),
            None => {
                self.push_new(key, value);
                None
            },
        };
        self.evict_to_capacity();
        previous
    }

    /// Evicts the least recently used entry and returns it.
    ///
    /// The eviction callback, if any, runs after the entry has been removed
    /// from the index and the recency order. Returns `None` on an empty
    /// cache.
    ///
    /// # Example
    ///
    /// ```
    /// use shardcache::policy::byte_lru::ByteLru;
    ///
    /// let mut cache: ByteLru<String> = ByteLru::new(0);
    /// cache.add("a", "1".to_string());
    /// cache.add("b", "2".to_string());
    /// cache.get("a");
    ///
    /// assert_eq!(cache.remove_oldest(), Some(("b".to_string(), "2".to_string())));
    /// assert_eq!(cache.used_bytes(), 2);
    /// ```
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let entry = self.order.pop_back()?;
        self.index.remove(&entry.key);
        self.used_bytes -= entry.charge;
        trace!(key = %entry.key, bytes = entry.charge, used_bytes = self.used_bytes, "evicted entry");

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(&entry.key, &entry.value);
        }
        Some((entry.key, entry.value))
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.order
            .iter()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Iterates keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(|entry| entry.key.as_str())
    }

    /// Drops every entry without invoking the eviction callback.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
        self.used_bytes = 0;
    }

    /// Verifies that the index, the recency order, and the byte count agree.
    ///
    /// Also reports values whose `byte_len` changed while cached.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but recency order holds {} entries",
                self.index.len(),
                self.order.len()
            )));
        }

        let ends = [
            ("most recent", self.order.front_id()),
            ("oldest", self.order.back_id()),
        ];
        for (end, id) in ends {
            let Some(id) = id else { continue };
            let indexed = self
                .order
                .get(id)
                .and_then(|entry| self.index.get(&entry.key));
            if indexed != Some(&id) {
                return Err(InvariantError::new(format!(
                    "{end} entry is not indexed at its list position"
                )));
            }
        }

        let mut total = 0usize;
        for entry in self.order.iter() {
            let Some(&id) = self.index.get(&entry.key) else {
                return Err(InvariantError::new(format!(
                    "key {:?} is in the recency order but not the index",
                    entry.key
                )));
            };
            let indexed_key = self.order.get(id).map(|indexed| indexed.key.as_str());
            if indexed_key != Some(entry.key.as_str()) {
                return Err(InvariantError::new(format!(
                    "index entry for {:?} points at the wrong slot",
                    entry.key
                )));
            }
            let current = entry.key.len() + entry.value.byte_len();
            if current != entry.charge {
                return Err(InvariantError::new(format!(
                    "entry {:?} was charged {} bytes but now reports {}",
                    entry.key, entry.charge, current
                )));
            }
            total += entry.charge;
        }

        if total != self.used_bytes {
            return Err(InvariantError::new(format!(
                "used_bytes is {} but entries sum to {}",
                self.used_bytes, total
            )));
        }
        if self.capacity_bytes != 0 && self.used_bytes > self.capacity_bytes {
            return Err(InvariantError::new(format!(
                "used_bytes {} exceeds capacity {}",
                self.used_bytes, self.capacity_bytes
            )));
        }
        Ok(())
    }

    fn replace(&mut self, id: SlotId, value: V) -> Option<V> {
        let entry = self.order.get_mut(id)?;
        let charge = entry.key.len() + value.byte_len();
        let old = std::mem::replace(&mut entry.value, value);
        self.used_bytes = self.used_bytes - entry.charge + charge;
        entry.charge = charge;
        self.order.move_to_front(id);
        Some(old)
    }

    fn push_new(&mut self, key: &str, value: V) {
        let charge = key.len() + value.byte_len();
        let id = self.order.push_front(Entry {
            key: key.to_owned(),
            value,
            charge,
        });
        self.index.insert(key.to_owned(), id);
        self.used_bytes += charge;
    }

    fn evict_to_capacity(&mut self) {
        while self.capacity_bytes != 0 && self.used_bytes > self.capacity_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }
}

impl<V> fmt::Debug for ByteLru<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteLru")
            .field("len", &self.order.len())
            .field("used_bytes", &self.used_bytes)
            .field("capacity_bytes", &self.capacity_bytes)
            .field("on_evicted", &self.on_evicted.is_some())
            .finish_non_exhaustive()
    }
}

impl<V> Default for ByteLru<V>
where
    V: ByteSized,
{
    /// Creates an unbounded cache.
    fn default() -> Self {
        Self::new(0)
    }
}

impl<K, V> Extend<(K, V)> for ByteLru<V>
where
    K: AsRef<str>,
    V: ByteSized,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key.as_ref(), value);
        }
    }
}

/// Thread-safe [`ByteLru`] guarded by a single mutex.
///
/// Every operation, lookups included, takes the same lock because `get`
/// reorders entries. Values are cloned out so no reference escapes the lock.
#[cfg(feature = "concurrency")]
pub struct ConcurrentByteLru<V> {
    inner: Arc<Mutex<ByteLru<V>>>,
}

#[cfg(feature = "concurrency")]
impl<V> Clone for ConcurrentByteLru<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<V> fmt::Debug for ConcurrentByteLru<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("ConcurrentByteLru")
            .field("len", &cache.order.len())
            .field("used_bytes", &cache.used_bytes)
            .field("capacity_bytes", &cache.capacity_bytes)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "concurrency")]
impl<V> From<ByteLru<V>> for ConcurrentByteLru<V> {
    fn from(cache: ByteLru<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<V> ConcurrentByteLru<V>
where
    V: ByteSized + Clone + Send,
{
    /// Creates a shared cache with the given byte budget.
    ///
    /// # Example
    ///
    /// ```
    /// use shardcache::policy::byte_lru::ConcurrentByteLru;
    ///
    /// let cache: ConcurrentByteLru<String> = ConcurrentByteLru::new(64);
    /// let handle = cache.clone();
    /// std::thread::spawn(move || {
    ///     handle.add("k", "v".to_string());
    /// })
    /// .join()
    /// .unwrap();
    /// assert_eq!(cache.get("k"), Some("v".to_string()));
    /// ```
    pub fn new(capacity_bytes: usize) -> Self {
        ByteLru::new(capacity_bytes).into()
    }

    /// Looks up `key`, marks it most recently used, and clones the value out.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut cache = self.inner.lock();
        cache.get(key).cloned()
    }

    /// Clones the value for `key` without changing its recency.
    pub fn peek(&self, key: &str) -> Option<V> {
        let cache = self.inner.lock();
        cache.peek(key).cloned()
    }

    /// See [`ByteLru::add`].
    ///
    /// The eviction callback runs while the lock is held; a callback that
    /// touches this same cache deadlocks.
    pub fn add(&self, key: &str, value: V) -> Option<V> {
        let mut cache = self.inner.lock();
        cache.add(key, value)
    }

    /// See [`ByteLru::remove_oldest`].
    pub fn remove_oldest(&self) -> Option<(String, V)> {
        let mut cache = self.inner.lock();
        cache.remove_oldest()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        self.inner.lock().used_bytes()
    }

    pub fn capacity_bytes(&self) -> usize {
        self.inner.lock().capacity_bytes()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Runs `f` with exclusive access to the underlying cache.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut ByteLru<V>) -> R) -> R {
        let mut cache = self.inner.lock();
        f(&mut cache)
    }
}
