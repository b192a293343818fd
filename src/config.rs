//! Configuration for the reference-counted cache.
//!
//! Configuration structs have all public fields for simple instantiation:
//!
//! - **Simple**: Just create the struct with all fields set
//! - **Validated once**: limits are checked when a cache is built from them
//!
//! # Sizing Guidelines
//!
//! ## Understanding `soft_limit` and `hard_limit`
//!
//! - **`hard_limit`**: Absolute cap on pooled entries. Once this many entries
//!   are linked, further misses produce *transient* entries that are released
//!   as soon as their scope ends and are never shared.
//! - **`soft_limit`**: Preferred number of pooled entries. Every miss first
//!   evicts idle entries, least recently used first, until at most this many
//!   remain. Entries still referenced by a scope are never evicted, so the
//!   pool can sit above the soft limit while callers hold on to resources.
//!
//! The gap between the two is head-room for bursts: with `soft_limit = 20` and
//! `hard_limit = 40`, up to 40 distinct resources can be shared at once, and
//! the pool shrinks back towards 20 idle resources on subsequent misses.
//!
//! A `hard_limit` of zero disables pooling entirely: every request creates a
//! fresh transient entry.
//!
//! # Examples
//!
//! ```
//! use refcounted_cache::RefCountedCacheConfig;
//!
//! let config = RefCountedCacheConfig {
//!     soft_limit: 20,
//!     hard_limit: 40,
//! };
//! assert!(config.validate().is_ok());
//! ```

use crate::error::ConfigError;
use core::fmt;

/// Residency limits for a [`RefCountedCache`](crate::RefCountedCache).
///
/// # Fields
///
/// - `soft_limit`: preferred number of pooled entries; idle entries beyond it
///   are evicted on the next miss.
/// - `hard_limit`: maximum number of pooled entries; misses beyond it are
///   served by transient entries.
///
/// `soft_limit` must not exceed `hard_limit`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RefCountedCacheConfig {
    /// Preferred maximum number of pooled entries.
    pub soft_limit: usize,
    /// Absolute maximum number of pooled entries.
    pub hard_limit: usize,
}

impl RefCountedCacheConfig {
    /// Checks that the limits are consistent.
    ///
    /// # Errors
    ///
    /// [`ConfigError::SoftLimitExceedsHardLimit`] if `soft_limit > hard_limit`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.soft_limit > self.hard_limit {
            return Err(ConfigError::SoftLimitExceedsHardLimit {
                soft_limit: self.soft_limit,
                hard_limit: self.hard_limit,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for RefCountedCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefCountedCacheConfig")
            .field("soft_limit", &self.soft_limit)
            .field("hard_limit", &self.hard_limit)
            .finish()
    }
}
