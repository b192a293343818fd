#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Lifecycle of an Entry
//!
//! ```text
//!            get_entry(key), miss
//!                    │
//!        pooled < hard_limit?
//!          │yes               │no
//!          ▼                  ▼
//!   ┌─────────────┐    ┌─────────────┐
//!   │   cached    │    │  transient  │
//!   │ (linked in  │    │ (never in   │
//!   │  the list)  │    │  the list)  │
//!   └──────┬──────┘    └──────┬──────┘
//!          │ last scope        │ last scope
//!          ▼ released          ▼ released
//!   ┌─────────────┐    ┌─────────────┐
//!   │    idle     │    │  released   │
//!   │ (reusable)  │    │  at once    │
//!   └──────┬──────┘    └─────────────┘
//!          │ miss while pooled > soft_limit,
//!          │ or trim()
//!          ▼
//!   ┌─────────────┐
//!   │  evicted    │
//!   │ (unlinked,  │
//!   │  released)  │
//!   └─────────────┘
//! ```
//!
//! ## Quick Reference
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RefCountedCache`] | Single-threaded bounded pool |
//! | [`Scope`] | One live reference; released on drop or by [`Scope::release`] |
//! | [`CacheSource`] | Client hooks: create, match, release |
//! | [`CacheEntry`] | Pooled payload, object and reference count |
//! | [`list::List`] | Singly linked list with a cursor that can splice and remove |
//! | `ConcurrentRefCountedCache` | Mutex-guarded pool (requires `concurrent`) |
//!
//! ## Code Examples
//!
//! ### Sharing a resource
//!
//! ```rust
//! use core::convert::Infallible;
//! use refcounted_cache::{CacheEntry, CacheSource, RefCountedCache};
//!
//! struct Pens;
//!
//! impl CacheSource for Pens {
//!     type Key = u32;
//!     type Data = u32;
//!     type Object = String;
//!     type Error = Infallible;
//!
//!     fn create_entry(&self, colour: &u32, _cached: bool) -> Result<(u32, String), Infallible> {
//!         Ok((*colour, format!("pen #{colour:06x}")))
//!     }
//!
//!     fn is_match(&self, colour: &u32, entry: &CacheEntry<Self>) -> bool {
//!         entry.data() == colour
//!     }
//! }
//!
//! let cache = RefCountedCache::new(2, 4, Pens).unwrap();
//! let red = cache.get_entry(&0xff0000).unwrap();
//! let also_red = cache.get_entry(&0xff0000).unwrap();
//! assert_eq!(*red, "pen #ff0000");
//! assert_eq!(also_red.ref_count(), 2);
//! ```
//!
//! ### Editing a list through a cursor
//!
//! ```rust
//! use refcounted_cache::list::List;
//!
//! let mut list: List<u32> = [1, 2, 3, 4].into_iter().collect();
//! let mut cursor = list.cursor();
//! while cursor.move_next() {
//!     if cursor.current() == Some(&3) {
//!         cursor.move_current_to_front().unwrap();
//!     }
//! }
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![3, 1, 2, 4]);
//! ```
//!
//! ### Validating limits
//!
//! ```rust
//! use refcounted_cache::RefCountedCacheConfig;
//! use refcounted_cache::error::ConfigError;
//!
//! let config = RefCountedCacheConfig { soft_limit: 10, hard_limit: 5 };
//! assert!(matches!(
//!     config.validate(),
//!     Err(ConfigError::SoftLimitExceedsHardLimit { .. })
//! ));
//! ```
//!
//! ## Concurrent Cache
//!
//! Enable the `concurrent` feature for a thread-safe version:
//!
//! ```toml
//! [dependencies]
//! refcounted-cache = { version = "0.1", features = ["concurrent"] }
//! ```
//!
//! ## Modules
//!
//! - [`list`]: Singly linked list with a cursor
//! - [`entry`]: The reference-counted entry type
//! - [`source`]: The client hook trait
//! - [`cache`]: The single-threaded cache
//! - [`scope`]: The RAII reference guard
//! - [`config`]: Cache limits
//! - [`error`]: Error types
//! - [`metrics`]: Counters and reporting
//! - `concurrent`: Thread-safe cache (requires `concurrent` feature)

/// Singly linked list with cursor-based editing.
///
/// Nodes live in an index arena, so moving the cursor's node to the front and
/// removing it are both O(1) without any unsafe code.
pub mod list;

/// Reference-counted cache entry.
pub mod entry;

/// Client hooks that create, match and release entries.
pub mod source;

/// The single-threaded reference-counted cache.
///
/// Holds the shared algorithm used by every cache flavour: predicate lookup,
/// move-to-front on hit, idle-entry sweep towards the soft limit and transient
/// fallback at the hard limit.
pub mod cache;

/// Released-once handles on cache entries.
pub mod scope;

/// Cache configuration.
pub mod config;

/// Error types.
pub mod error;

/// Cache metrics system.
///
/// Counters for hits, creations, evictions and release failures, reported
/// through the [`CacheMetrics`] trait.
pub mod metrics;

/// Concurrent cache implementation.
///
/// Provides a thread-safe cache that guards the shared algorithm with a single
/// mutex.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use cache::RefCountedCache;
pub use config::RefCountedCacheConfig;
pub use entry::CacheEntry;
pub use error::{CacheError, ConfigError, CursorError};
pub use metrics::{CacheMetrics, RefCountedCacheMetrics};
pub use scope::{Scope, ScopeOwner};
pub use source::CacheSource;

#[cfg(feature = "concurrent")]
pub use concurrent::{ConcurrentRefCountedCache, ConcurrentScope};
