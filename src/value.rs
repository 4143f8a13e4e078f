//! Immutable byte payload for cache entries.
//!
//! [`ByteView`] wraps a [`Bytes`] buffer. Clones share the buffer, and no
//! handle can write to it, so a value read out of a cache can never alter
//! what the cache holds. Callers that need an owned, mutable buffer take a
//! copy with [`ByteView::byte_slice`].
//!
//! ## Example Usage
//!
//! ```
//! use shardcache::value::ByteView;
//! use shardcache::traits::ByteSized;
//!
//! let view = ByteView::from("630");
//! assert_eq!(view.byte_len(), 3);
//!
//! let mut copy = view.byte_slice();
//! copy[0] = b'9';
//! assert_eq!(view.to_string(), "630");
//! ```

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

use crate::traits::ByteSized;

/// Read-only view over a shared byte buffer.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    /// Creates a view from anything convertible into [`Bytes`].
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Returns the number of bytes held.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the view holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns an owned copy of the bytes.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Borrows the bytes without copying.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Interprets the bytes as UTF-8, replacing invalid sequences.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Returns the underlying shared buffer.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl ByteSized for ByteView {
    #[inline]
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.len())
            .field("bytes", &self.bytes)
            .finish()
    }
}

impl From<Bytes> for ByteView {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ByteView {
    fn from(bytes: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(bytes))
    }
}

impl From<String> for ByteView {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::from(s.as_bytes())
    }
}
