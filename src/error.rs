//! Error types for shardcache.
//!
//! Cache and ring operations never fail: a miss is `None`, an empty ring
//! routes to `None`, and a zero byte budget means "unbounded". Errors only
//! show up at the edges:
//!
//! - [`ConfigError`]: a configuration that could never work, such as a ring
//!   with zero replicas.
//! - [`InvariantError`]: returned by
//!   [`ByteLru::check_invariants`](crate::policy::byte_lru::ByteLru::check_invariants)
//!   when the index, recency order, or byte count disagree.
//!
//! ## Example Usage
//!
//! ```
//! use shardcache::builder::HashRingBuilder;
//! use shardcache::error::ConfigError;
//!
//! let ring = HashRingBuilder::new().replicas(3).try_build();
//! assert!(ring.is_ok());
//!
//! let bad: Result<_, ConfigError> = HashRingBuilder::new().replicas(0).try_build();
//! assert!(bad.is_err());
//! ```

use std::fmt;

/// Error returned when cache bookkeeping is inconsistent.
///
/// Carries a description of the check that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cache invariant violated: {}", self.0)
    }
}

impl std::error::Error for InvariantError {}

/// Error returned when a builder or fallible constructor is given a
/// configuration it cannot honor.
///
/// # Example
///
/// ```
/// use shardcache::ds::HashRing;
///
/// let err = HashRing::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("replicas"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_display_prefixes_message() {
        let err = InvariantError::new("used_bytes is 4 but entries sum to 2");
        assert_eq!(
            err.to_string(),
            "cache invariant violated: used_bytes is 4 but entries sum to 2"
        );
        assert_eq!(err.message(), "used_bytes is 4 but entries sum to 2");
    }

    #[test]
    fn config_display_prefixes_message() {
        let err = ConfigError::new("replicas must be greater than zero");
        assert_eq!(
            err.to_string(),
            "invalid configuration: replicas must be greater than zero"
        );
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn errors_box_as_std_error() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(ConfigError::new("x"));
        assert!(boxed.to_string().ends_with('x'));
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(InvariantError::new("y"));
        assert!(boxed.to_string().ends_with('y'));
    }
}
