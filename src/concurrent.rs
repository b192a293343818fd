//! Concurrent Reference-Counted Cache
//!
//! A thread-safe counterpart to [`RefCountedCache`](crate::RefCountedCache).
//! It runs the same algorithm behind a single `parking_lot::Mutex`.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          ConcurrentRefCountedCache          │
//! │                                             │
//! │   get_entry / scope drop / trim             │
//! │                  │                          │
//! │             ┌────▼───┐                      │
//! │             │ Mutex  │                      │
//! │             └────┬───┘                      │
//! │        ┌─────────▼──────────┐               │
//! │        │ RefCountedSegment  │               │
//! │        │ (recency list +    │               │
//! │        │  limits + source)  │               │
//! │        └────────────────────┘               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Why One Lock?
//!
//! Lookups are a predicate scan over the whole list, not a hash probe, so there
//! is no key-to-shard mapping to stripe on. The soft and hard limits are also
//! global: splitting the pool would turn one bound of `hard_limit` entries into
//! several smaller ones. Limits are expected to be small, so the critical
//! section stays short.
//!
//! Every reference count change happens with the mutex held, including the
//! decrement performed when a [`Scope`] is dropped on another thread.
//!
//! The source's `create_entry`, `is_match` and `release_entry` run under the
//! lock. A source that calls back into the same cache deadlocks.
//!
//! # Thread Safety
//!
//! `ConcurrentRefCountedCache<S>` is `Send + Sync` when `S`, `S::Data` and
//! `S::Object` are `Send + Sync`, and can be shared via `Arc` or scoped threads.
//!
//! # Example
//!
//! ```
//! use core::convert::Infallible;
//! use refcounted_cache::{CacheEntry, CacheSource, ConcurrentRefCountedCache};
//! use std::sync::Arc;
//! use std::thread;
//!
//! struct Handles;
//!
//! impl CacheSource for Handles {
//!     type Key = u32;
//!     type Data = u32;
//!     type Object = String;
//!     type Error = Infallible;
//!
//!     fn create_entry(&self, key: &u32, _cached: bool) -> Result<(u32, String), Infallible> {
//!         Ok((*key, format!("handle-{key}")))
//!     }
//!
//!     fn is_match(&self, key: &u32, entry: &CacheEntry<Self>) -> bool {
//!         entry.data() == key
//!     }
//! }
//!
//! let cache = Arc::new(ConcurrentRefCountedCache::new(4, 8, Handles).unwrap());
//!
//! let handles: Vec<_> = (0..4u32)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..100u32 {
//!                 let scope = cache.get_entry(&((t + i) % 6)).unwrap();
//!                 assert!(scope.starts_with("handle-"));
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//!
//! assert!(cache.len() <= 8);
//! ```

use crate::cache::RefCountedSegment;
use crate::config::RefCountedCacheConfig;
use crate::entry::CacheEntry;
use crate::error::{CacheError, ConfigError};
use crate::metrics::{CacheMetrics, RefCountedCacheMetrics};
use crate::scope::{Scope, ScopeOwner};
use crate::source::CacheSource;
use core::fmt;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Scope handed out by a [`ConcurrentRefCountedCache`].
pub type ConcurrentScope<'c, S> = Scope<'c, ConcurrentRefCountedCache<S>>;

/// A thread-safe bounded pool of reference-counted entries.
///
/// Same semantics as [`RefCountedCache`](crate::RefCountedCache); every
/// operation takes the cache's mutex for its duration.
pub struct ConcurrentRefCountedCache<S: CacheSource> {
    segment: Mutex<RefCountedSegment<S>>,
}

impl<S: CacheSource> ConcurrentRefCountedCache<S> {
    /// Creates a cache with the given soft and hard limits.
    ///
    /// # Errors
    ///
    /// [`ConfigError::SoftLimitExceedsHardLimit`] if `soft_limit > hard_limit`.
    pub fn new(soft_limit: usize, hard_limit: usize, source: S) -> Result<Self, ConfigError> {
        Self::init(
            RefCountedCacheConfig {
                soft_limit,
                hard_limit,
            },
            source,
        )
    }

    /// Creates a cache from a configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the configuration does not validate.
    pub fn init(config: RefCountedCacheConfig, source: S) -> Result<Self, ConfigError> {
        Ok(ConcurrentRefCountedCache {
            segment: Mutex::new(RefCountedSegment::init(config, source)?),
        })
    }

    /// Returns a scope on the entry matching `key`, creating it on a miss.
    ///
    /// # Errors
    ///
    /// - [`CacheError::Create`] if the source fails to build a new entry.
    /// - [`CacheError::Release`] if releasing an evicted entry fails during the
    ///   sweep that precedes creation.
    pub fn get_entry(&self, key: &S::Key) -> Result<ConcurrentScope<'_, S>, CacheError<S::Error>> {
        let entry = self.segment.lock().acquire(key)?;
        Ok(Scope::new(self, entry))
    }

    /// Evicts every idle pooled entry now and returns how many were removed.
    ///
    /// # Errors
    ///
    /// [`CacheError::Release`] on the first failed release.
    pub fn trim(&self) -> Result<usize, CacheError<S::Error>> {
        self.segment.lock().trim()
    }

    /// The configured limits.
    pub fn config(&self) -> RefCountedCacheConfig {
        self.segment.lock().config()
    }

    /// Preferred maximum number of pooled entries.
    pub fn soft_limit(&self) -> usize {
        self.config().soft_limit
    }

    /// Absolute maximum number of pooled entries.
    pub fn hard_limit(&self) -> usize {
        self.config().hard_limit
    }

    /// Number of pooled entries. Transient entries are not counted.
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if no entry is pooled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of pooled entries with no live scope.
    pub fn idle_count(&self) -> usize {
        self.segment.lock().idle_count()
    }

    /// Runs `f` with the cache's source while holding the lock.
    pub fn with_source<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(self.segment.lock().source())
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> RefCountedCacheMetrics {
        self.segment.lock().metrics().clone()
    }
}

impl<S: CacheSource> ScopeOwner for ConcurrentRefCountedCache<S> {
    type Source = S;

    fn release_entry(&self, entry: Arc<CacheEntry<S>>) -> Result<(), CacheError<S::Error>> {
        self.segment.lock().release(entry)
    }
}

impl<S: CacheSource> CacheMetrics for ConcurrentRefCountedCache<S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentRefCounted"
    }
}

impl<S: CacheSource> fmt::Debug for ConcurrentRefCountedCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentRefCountedCache")
            .field("segment", &*self.segment.lock())
            .finish()
    }
}
