//! Capabilities consumed by the cache and the ring.
//!
//! Neither component cares what a payload or a hash function *is*; each asks
//! for exactly one capability:
//!
//! | Capability  | Consumer                          | Contract                               |
//! |-------------|-----------------------------------|----------------------------------------|
//! | [`ByteSized`] | [`ByteLru`](crate::policy::byte_lru::ByteLru) | stable byte footprint of a value |
//! | [`HashFn`]  | [`HashRing`](crate::ds::HashRing) | maps bytes to a `u32` ring position    |
//!
//! ## Example Usage
//!
//! ```
//! use shardcache::traits::ByteSized;
//!
//! struct Page {
//!     header: [u8; 16],
//!     body: Vec<u8>,
//! }
//!
//! impl ByteSized for Page {
//!     fn byte_len(&self) -> usize {
//!         self.header.len() + self.body.len()
//!     }
//! }
//!
//! let page = Page { header: [0; 16], body: vec![1, 2, 3] };
//! assert_eq!(page.byte_len(), 19);
//! ```

use std::rc::Rc;
use std::sync::Arc;

use bytes::Bytes;

/// A value that can report its memory footprint in bytes.
///
/// The reported size must stay the same for as long as the value is held by
/// a cache; byte accounting is undefined otherwise.
pub trait ByteSized {
    /// Returns the footprint of this value in bytes.
    fn byte_len(&self) -> usize;
}

impl ByteSized for Vec<u8> {
    #[inline]
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSized for Box<[u8]> {
    #[inline]
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSized for String {
    #[inline]
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSized for &'static str {
    #[inline]
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSized for Bytes {
    #[inline]
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl<T: ByteSized + ?Sized> ByteSized for Arc<T> {
    #[inline]
    fn byte_len(&self) -> usize {
        (**self).byte_len()
    }
}

impl<T: ByteSized + ?Sized> ByteSized for Rc<T> {
    #[inline]
    fn byte_len(&self) -> usize {
        (**self).byte_len()
    }
}

/// Pluggable hash used to place ring points and keys.
///
/// Any closure or function pointer of the right shape works; the ring only
/// needs it to be deterministic.
pub type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_len_of_std_payloads() {
        assert_eq!(vec![0u8; 5].byte_len(), 5);
        assert_eq!(String::from("hello").byte_len(), 5);
        assert_eq!("héllo".byte_len(), 6);
        assert_eq!(Box::<[u8]>::from(&b"abc"[..]).byte_len(), 3);
        assert_eq!(Bytes::from_static(b"abcd").byte_len(), 4);
    }

    #[test]
    fn byte_len_sees_through_shared_pointers() {
        let shared = Arc::new(vec![0u8; 7]);
        assert_eq!(shared.byte_len(), 7);
        let local = Rc::new(String::from("ab"));
        assert_eq!(local.byte_len(), 2);
    }

    #[test]
    fn empty_values_report_zero() {
        assert_eq!(Vec::<u8>::new().byte_len(), 0);
        assert_eq!("".byte_len(), 0);
    }

    #[test]
    fn closures_coerce_to_hash_fn() {
        let constant: HashFn = Arc::new(|_| 7);
        assert_eq!(constant(b"anything"), 7);
        let by_len: HashFn = Arc::new(|data| data.len() as u32);
        assert_eq!(by_len(b"abc"), 3);
    }
}
