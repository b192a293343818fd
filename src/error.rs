//! Error types for the refcounted-cache crate.
//!
//! ## Key Components
//!
//! - [`CursorError`]: returned by [`Cursor`](crate::list::Cursor) mutators when
//!   the cursor is not positioned on a node.
//! - [`ConfigError`]: returned when cache limits are inconsistent.
//! - [`CacheError`]: wraps a failure reported by the client's
//!   [`CacheSource`](crate::CacheSource), tagged with the phase it came from.
//!
//! ## Example Usage
//!
//! ```
//! use refcounted_cache::error::ConfigError;
//! use refcounted_cache::RefCountedCacheConfig;
//!
//! let config = RefCountedCacheConfig { soft_limit: 8, hard_limit: 4 };
//! assert_eq!(
//!     config.validate(),
//!     Err(ConfigError::SoftLimitExceedsHardLimit { soft_limit: 8, hard_limit: 4 })
//! );
//! ```

use thiserror::Error;

/// Error returned when a cursor mutator is called without a current node.
///
/// A cursor has no current node before its first
/// [`move_next`](crate::list::Cursor::move_next), after it has run off the end
/// of the list, and right after the current node was moved or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The cursor is not positioned on a node.
    #[error("cursor has no current element")]
    NoCurrent,
}

/// Error returned when cache limits are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The preferred residency bound is larger than the absolute cap.
    #[error("soft limit ({soft_limit}) must not exceed hard limit ({hard_limit})")]
    SoftLimitExceedsHardLimit {
        /// Configured soft limit.
        soft_limit: usize,
        /// Configured hard limit.
        hard_limit: usize,
    },
}

/// Failure surfaced by the cache on behalf of its [`CacheSource`](crate::CacheSource).
///
/// The cache never retries or swallows a source error on an explicit call path;
/// the variant records which phase failed so callers can tell a failed
/// construction (nothing was linked) from a failed disposal (the entry was
/// already unlinked and is gone).
#[derive(Debug, Error)]
pub enum CacheError<E>
where
    E: std::error::Error + 'static,
{
    /// `create_entry` failed on a miss. No entry was linked.
    #[error("failed to create cache entry")]
    Create(#[source] E),
    /// `release_entry` failed. The entry had already been unlinked.
    #[error("failed to release cache entry")]
    Release(#[source] E),
}

impl<E> CacheError<E>
where
    E: std::error::Error + 'static,
{
    /// Returns the underlying source error.
    pub fn into_inner(self) -> E {
        match self {
            CacheError::Create(e) | CacheError::Release(e) => e,
        }
    }

    /// Returns `true` if this error came from entry construction.
    pub fn is_create(&self) -> bool {
        matches!(self, CacheError::Create(_))
    }

    /// Returns `true` if this error came from entry disposal.
    pub fn is_release(&self) -> bool {
        matches!(self, CacheError::Release(_))
    }
}
