//! Bounded, Reference-Counted Object Cache
//!
//! Lets many callers share expensive, logically identical resources (pooled
//! native handles, fonts, brushes, connections) while bounding how many of them
//! stay resident.
//!
//! # Algorithm
//!
//! Entries live in a singly linked recency list, most recently touched first.
//!
//! ```text
//! get_entry(key)
//!   │
//!   ├─ scan front → back with is_match ──hit──▶ ref_count += 1, move to front
//!   │
//!   └─ miss
//!        ├─ sweep: while pooled > soft_limit, evict idle entries (LRU first)
//!        ├─ pooled < hard_limit ──▶ create cached entry, push front
//!        └─ otherwise           ──▶ create transient entry (never linked)
//!
//! Scope released
//!   ├─ ref_count -= 1
//!   └─ transient && ref_count == 0 ──▶ release object now
//! ```
//!
//! Pooled entries are **not** released when their count drops to zero. They
//! stay available for reuse until a later miss needs the room, so a resource
//! released and immediately re-acquired is not rebuilt.
//!
//! Transient entries are invisible to lookups: while the pool is full, every
//! miss builds a new object, even for a key seen a moment ago. Memory is bounded
//! by `hard_limit` pooled entries plus whatever transient entries are alive.
//!
//! An entry is always unlinked before its object is released, so a failing
//! `release_entry` never leaves a dangling entry in the list.
//!
//! # Performance Characteristics
//!
//! - Hit: O(position in list) scan, O(1) move to front
//! - Miss: O(n) scan plus an O(n) sweep when above the soft limit
//! - Release: O(1)
//!
//! Limits are expected to be small (tens of entries), which is what makes a
//! predicate scan preferable to hashing.
//!
//! # Thread Safety
//!
//! [`RefCountedCache`] is single-threaded. With the `concurrent` feature,
//! [`ConcurrentRefCountedCache`](crate::ConcurrentRefCountedCache) wraps the
//! same logic in a single mutex.

use crate::config::RefCountedCacheConfig;
use crate::entry::CacheEntry;
use crate::error::{CacheError, ConfigError};
use crate::list::List;
use crate::metrics::{CacheMetrics, RefCountedCacheMetrics};
use crate::scope::{Scope, ScopeOwner};
use crate::source::CacheSource;
use core::cell::RefCell;
use core::fmt;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shared cache state and algorithm.
///
/// Used by both [`RefCountedCache`] (behind a `RefCell`) and
/// `ConcurrentRefCountedCache` (behind a mutex). Every method takes
/// `&mut self`, so reference counts are only ever changed with exclusive access.
pub(crate) struct RefCountedSegment<S: CacheSource> {
    config: RefCountedCacheConfig,
    source: S,
    list: List<Arc<CacheEntry<S>>>,
    metrics: RefCountedCacheMetrics,
}

impl<S: CacheSource> RefCountedSegment<S> {
    pub(crate) fn init(config: RefCountedCacheConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(RefCountedSegment {
            config,
            source,
            list: List::with_capacity(config.hard_limit),
            metrics: RefCountedCacheMetrics::new(),
        })
    }

    #[inline]
    pub(crate) fn config(&self) -> RefCountedCacheConfig {
        self.config
    }

    #[inline]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    pub(crate) fn idle_count(&self) -> usize {
        self.list.iter().filter(|entry| entry.is_idle()).count()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &RefCountedCacheMetrics {
        &self.metrics
    }

    /// Looks up or creates the entry for `key` and takes one reference to it.
    pub(crate) fn acquire(
        &mut self,
        key: &S::Key,
    ) -> Result<Arc<CacheEntry<S>>, CacheError<S::Error>> {
        if let Some(entry) = self.find(key) {
            self.metrics.record_hit();
            log::trace!("cache hit, ref_count now {}", entry.ref_count());
            return Ok(entry);
        }
        self.metrics.record_miss();

        self.sweep()?;

        let cached = self.list.len() < self.config.hard_limit;
        let (data, object) = self
            .source
            .create_entry(key, cached)
            .map_err(CacheError::Create)?;
        let entry = Arc::new(CacheEntry::new(data, object, cached));
        entry.retain();

        if cached {
            self.list.push_front(Arc::clone(&entry));
            self.metrics.record_cached_creation(self.list.len());
            log::trace!("cache miss, pooled entries now {}", self.list.len());
        } else {
            self.metrics.record_transient_creation();
            log::debug!(
                "cache at hard limit ({}), serving transient entry",
                self.config.hard_limit
            );
        }

        Ok(entry)
    }

    /// Drops one reference taken by [`acquire`](Self::acquire).
    ///
    /// A transient entry whose count reaches zero is released immediately;
    /// pooled entries stay linked whatever their count.
    pub(crate) fn release(
        &mut self,
        entry: Arc<CacheEntry<S>>,
    ) -> Result<(), CacheError<S::Error>> {
        let remaining = entry.release_ref();
        if entry.is_cached() || remaining > 0 {
            return Ok(());
        }

        self.metrics.record_transient_disposal();
        dispose(&self.source, &mut self.metrics, entry).map_err(|err| {
            self.metrics.record_release_failure();
            CacheError::Release(err)
        })
    }

    /// Evicts every idle pooled entry and returns how many were removed.
    pub(crate) fn trim(&mut self) -> Result<usize, CacheError<S::Error>> {
        let evicted = self.evict_idle(usize::MAX)?;
        if evicted > 0 {
            log::debug!("trimmed {evicted} idle entries");
        }
        Ok(evicted)
    }

    /// Finds the first entry matching `key`, takes a reference and moves it to
    /// the front of the recency list.
    fn find(&mut self, key: &S::Key) -> Option<Arc<CacheEntry<S>>> {
        let mut cursor = self.list.cursor();
        while cursor.move_next() {
            let entry = match cursor.current() {
                Some(entry) if self.source.is_match(key, entry) => Arc::clone(entry),
                _ => continue,
            };
            entry.retain();
            // The cursor sits on the matched node, so the splice cannot fail.
            match cursor.move_current_to_front() {
                Ok(()) => return Some(entry),
                Err(_) => unreachable!("cursor lost its node during lookup"),
            }
        }
        None
    }

    /// Brings the pooled count back down to the soft limit where idle entries
    /// allow it.
    fn sweep(&mut self) -> Result<usize, CacheError<S::Error>> {
        let overage = self.list.len().saturating_sub(self.config.soft_limit);
        if overage == 0 {
            return Ok(0);
        }
        let evicted = self.evict_idle(overage)?;
        if evicted > 0 {
            log::debug!(
                "evicted {evicted} idle entries, {} pooled (soft limit {})",
                self.list.len(),
                self.config.soft_limit
            );
        }
        Ok(evicted)
    }

    /// Evicts up to `max` idle entries, least recently used first.
    ///
    /// The list is ordered most recent first and can only be walked forwards,
    /// so the least recently used idle entries are the last ones a forward walk
    /// meets: skip the first `idle - max` idle entries and unlink the rest.
    /// Victims are unlinked before any of them is released, then released
    /// oldest first. A failed release does not stop the others; the first
    /// failure is returned.
    fn evict_idle(&mut self, max: usize) -> Result<usize, CacheError<S::Error>> {
        let idle = self.idle_count();
        let target = idle.min(max);
        if target == 0 {
            return Ok(0);
        }

        let mut skip = idle - target;
        let mut victims = Vec::with_capacity(target);
        let mut cursor = self.list.cursor();
        while victims.len() < target && cursor.move_next() {
            if !cursor.current().is_some_and(|entry| entry.is_idle()) {
                continue;
            }
            if skip > 0 {
                skip -= 1;
                continue;
            }
            // Positioned on an idle node just above.
            match cursor.remove_current() {
                Ok(entry) => victims.push(entry),
                Err(_) => unreachable!("cursor lost its node during eviction"),
            }
        }

        let evicted = victims.len();
        let mut first_error = None;
        for entry in victims.into_iter().rev() {
            self.metrics.record_eviction();
            if let Err(err) = dispose(&self.source, &mut self.metrics, entry) {
                self.metrics.record_release_failure();
                if first_error.is_none() {
                    first_error = Some(err);
                } else {
                    log::warn!("failed to release evicted entry: {err}");
                }
            }
        }

        match first_error {
            Some(err) => Err(CacheError::Release(err)),
            None => Ok(evicted),
        }
    }
}

/// Hands an unlinked, unreferenced entry back to its source.
///
/// An entry that still has other owners (a scope was leaked with
/// `mem::forget`) cannot be handed over. It is counted as a release failure
/// and left to drop with its last owner.
fn dispose<S: CacheSource>(
    source: &S,
    metrics: &mut RefCountedCacheMetrics,
    entry: Arc<CacheEntry<S>>,
) -> Result<(), S::Error> {
    match Arc::try_unwrap(entry) {
        Ok(entry) => source.release_entry(entry),
        Err(shared) => {
            metrics.record_release_failure();
            log::warn!(
                "cache entry still has {} owners; it will not be released",
                Arc::strong_count(&shared)
            );
            Ok(())
        }
    }
}

impl<S: CacheSource> Drop for RefCountedSegment<S> {
    fn drop(&mut self) {
        while let Some(entry) = self.list.pop_front() {
            if let Err(err) = dispose(&self.source, &mut self.metrics, entry) {
                log::warn!("failed to release pooled entry while dropping cache: {err}");
            }
        }
    }
}

impl<S: CacheSource> fmt::Debug for RefCountedSegment<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefCountedSegment")
            .field("soft_limit", &self.config.soft_limit)
            .field("hard_limit", &self.config.hard_limit)
            .field("len", &self.list.len())
            .finish()
    }
}

/// A bounded pool of reference-counted entries, single-threaded.
///
/// Callers obtain a [`Scope`] from [`get_entry`](Self::get_entry); while any
/// scope for an entry is alive the entry is shared with every other caller
/// whose key matches it. Dropping (or [releasing](Scope::release)) the scope
/// gives the reference back.
///
/// # Panics
///
/// The cache uses a `RefCell` internally. A [`CacheSource`] that calls back
/// into the same cache from `create_entry`, `is_match` or `release_entry`
/// panics with a borrow error.
///
/// # Examples
///
/// ```
/// use core::convert::Infallible;
/// use refcounted_cache::{CacheEntry, CacheSource, RefCountedCache};
///
/// struct Fonts;
///
/// impl CacheSource for Fonts {
///     type Key = str;
///     type Data = String;
///     type Object = Vec<u8>;
///     type Error = Infallible;
///
///     fn create_entry(&self, key: &str, _cached: bool) -> Result<(String, Vec<u8>), Infallible> {
///         Ok((key.to_owned(), key.as_bytes().to_vec()))
///     }
///
///     fn is_match(&self, key: &str, entry: &CacheEntry<Self>) -> bool {
///         entry.data() == key
///     }
/// }
///
/// let cache = RefCountedCache::new(2, 4, Fonts).unwrap();
///
/// let a = cache.get_entry("Segoe UI").unwrap();
/// let b = cache.get_entry("Segoe UI").unwrap();
/// assert!(core::ptr::eq(a.object(), b.object()));
/// assert_eq!(b.ref_count(), 2);
/// ```
pub struct RefCountedCache<S: CacheSource> {
    segment: RefCell<RefCountedSegment<S>>,
}

impl<S: CacheSource> RefCountedCache<S> {
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
        Ok(RefCountedCache {
            segment: RefCell::new(RefCountedSegment::init(config, source)?),
        })
    }

    /// Returns a scope on the entry matching `key`, creating it on a miss.
    ///
    /// # Errors
    ///
    /// - [`CacheError::Create`] if the source fails to build a new entry.
    /// - [`CacheError::Release`] if releasing an evicted entry fails during the
    ///   sweep that precedes creation. The failed entry is already gone and no
    ///   new entry is created.
    pub fn get_entry(&self, key: &S::Key) -> Result<Scope<'_, Self>, CacheError<S::Error>> {
        let entry = self.segment.borrow_mut().acquire(key)?;
        Ok(Scope::new(self, entry))
    }

    /// Evicts every idle pooled entry now and returns how many were removed.
    ///
    /// # Errors
    ///
    /// [`CacheError::Release`] on the first failed release.
    pub fn trim(&self) -> Result<usize, CacheError<S::Error>> {
        self.segment.borrow_mut().trim()
    }

    /// The configured limits.
    pub fn config(&self) -> RefCountedCacheConfig {
        self.segment.borrow().config()
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
        self.segment.borrow().len()
    }

    /// Returns `true` if no entry is pooled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of pooled entries with no live scope.
    pub fn idle_count(&self) -> usize {
        self.segment.borrow().idle_count()
    }

    /// Runs `f` with the cache's source.
    pub fn with_source<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(self.segment.borrow().source())
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> RefCountedCacheMetrics {
        self.segment.borrow().metrics().clone()
    }
}

impl<S: CacheSource> ScopeOwner for RefCountedCache<S> {
    type Source = S;

    fn release_entry(&self, entry: Arc<CacheEntry<S>>) -> Result<(), CacheError<S::Error>> {
        self.segment.borrow_mut().release(entry)
    }
}

impl<S: CacheSource> CacheMetrics for RefCountedCache<S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.borrow().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.borrow().metrics().algorithm_name()
    }
}

impl<S: CacheSource> fmt::Debug for RefCountedCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefCountedCache")
            .field("segment", &*self.segment.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell as StdRefCell};
    use std::rc::Rc;
    use thiserror::Error;

    #[derive(Debug, Error, PartialEq, Eq)]
    enum PoolError {
        #[error("refused to create {0}")]
        Create(u32),
        #[error("refused to release {0}")]
        Release(u32),
    }

    /// Pool of `Rc<u32>` objects that logs every release and can be told to fail.
    #[derive(Default)]
    struct Numbers {
        released: StdRefCell<Vec<u32>>,
        fail_create: Cell<Option<u32>>,
        fail_release: Cell<Option<u32>>,
        created_transient: Cell<usize>,
    }

    impl CacheSource for Numbers {
        type Key = u32;
        type Data = u32;
        type Object = Rc<u32>;
        type Error = PoolError;

        fn create_entry(&self, key: &u32, cached: bool) -> Result<(u32, Rc<u32>), PoolError> {
            if self.fail_create.get() == Some(*key) {
                return Err(PoolError::Create(*key));
            }
            if !cached {
                self.created_transient.set(self.created_transient.get() + 1);
            }
            Ok((*key, Rc::new(*key)))
        }

        fn is_match(&self, key: &u32, entry: &CacheEntry<Self>) -> bool {
            entry.data() == key
        }

        fn release_entry(&self, entry: CacheEntry<Self>) -> Result<(), PoolError> {
            let key = *entry.data();
            self.released.borrow_mut().push(key);
            if self.fail_release.get() == Some(key) {
                return Err(PoolError::Release(key));
            }
            Ok(())
        }
    }

    fn make_cache(soft: usize, hard: usize) -> RefCountedCache<Numbers> {
        RefCountedCache::new(soft, hard, Numbers::default()).unwrap()
    }

    fn released(cache: &RefCountedCache<Numbers>) -> Vec<u32> {
        cache.with_source(|s| s.released.borrow().clone())
    }

    fn pooled_keys(cache: &RefCountedCache<Numbers>) -> Vec<u32> {
        cache.segment.borrow().list.iter().map(|e| *e.data()).collect()
    }

    #[test]
    fn test_rejects_soft_above_hard() {
        let err = RefCountedCache::new(3, 2, Numbers::default()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::SoftLimitExceedsHardLimit {
                soft_limit: 3,
                hard_limit: 2
            }
        );
    }

    #[test]
    fn test_hit_shares_object_and_counts_refs() {
        let cache = make_cache(2, 4);
        let a = cache.get_entry(&1).unwrap();
        let b = cache.get_entry(&1).unwrap();
        assert!(Rc::ptr_eq(a.object(), b.object()));
        assert_eq!(a.ref_count(), 2);
        drop(b);
        assert_eq!(a.ref_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_hit_moves_entry_to_front() {
        let cache = make_cache(4, 4);
        for key in 1..=3 {
            cache.get_entry(&key).unwrap();
        }
        assert_eq!(pooled_keys(&cache), vec![3, 2, 1]);
        cache.get_entry(&1).unwrap();
        assert_eq!(pooled_keys(&cache), vec![1, 3, 2]);
    }

    #[test]
    fn test_idle_entry_is_retained_and_reused() {
        let cache = make_cache(2, 4);
        let first = cache.get_entry(&7).unwrap().object().clone();
        assert_eq!(cache.idle_count(), 1);
        let again = cache.get_entry(&7).unwrap();
        assert!(Rc::ptr_eq(&first, again.object()));
        assert!(released(&cache).is_empty());
    }

    #[test]
    fn test_transient_entry_released_on_last_scope() {
        let cache = make_cache(0, 1);
        let _pooled = cache.get_entry(&1).unwrap();
        let t1 = cache.get_entry(&2).unwrap();
        let t2 = cache.get_entry(&2).unwrap();
        assert!(!t1.is_cached());
        assert!(!Rc::ptr_eq(t1.object(), t2.object()));
        assert_eq!(cache.len(), 1);

        t1.release().unwrap();
        assert_eq!(released(&cache), vec![2]);
        drop(t2);
        assert_eq!(released(&cache), vec![2, 2]);
        assert_eq!(cache.stats().transient_disposals, 2);
    }

    #[test]
    fn test_sweep_evicts_least_recent_idle_entries() {
        let cache = make_cache(2, 4);
        let held: Vec<_> = (1..=4).map(|k| cache.get_entry(&k).unwrap()).collect();
        drop(held);
        assert!(released(&cache).is_empty());
        // Touch 1 so it is the most recent idle entry.
        cache.get_entry(&1).unwrap();
        assert_eq!(pooled_keys(&cache), vec![1, 4, 3, 2]);

        let _s = cache.get_entry(&9).unwrap();
        assert_eq!(released(&cache), vec![2, 3]);
        assert_eq!(pooled_keys(&cache), vec![9, 1, 4]);
        assert_eq!(cache.stats().evictions, 2);
    }

    #[test]
    fn test_sweep_skips_referenced_entries() {
        let cache = make_cache(1, 4);
        let held: Vec<_> = (1..=3).map(|k| cache.get_entry(&k).unwrap()).collect();
        let _s = cache.get_entry(&4).unwrap();
        assert!(released(&cache).is_empty());
        assert_eq!(cache.len(), 4);
        drop(held);
        assert_eq!(cache.idle_count(), 3);
    }

    #[test]
    fn test_sweep_frees_room_below_hard_limit() {
        let cache = make_cache(1, 2);
        cache.get_entry(&1).unwrap();
        cache.get_entry(&2).unwrap();
        // At the hard limit, but both entries are idle: the sweep makes room.
        let s = cache.get_entry(&3).unwrap();
        assert!(s.is_cached());
        assert_eq!(released(&cache), vec![1]);
        assert_eq!(pooled_keys(&cache), vec![3, 2]);
    }

    #[test]
    fn test_zero_hard_limit_never_pools() {
        let cache = make_cache(0, 0);
        let a = cache.get_entry(&1).unwrap();
        let b = cache.get_entry(&1).unwrap();
        assert!(!a.is_cached());
        assert!(!Rc::ptr_eq(a.object(), b.object()));
        assert!(cache.is_empty());
        assert_eq!(cache.with_source(|s| s.created_transient.get()), 2);
    }

    #[test]
    fn test_create_failure_links_nothing() {
        let cache = make_cache(2, 4);
        cache.with_source(|s| s.fail_create.set(Some(5)));
        let err = cache.get_entry(&5).unwrap_err();
        assert!(err.is_create());
        assert_eq!(err.into_inner(), PoolError::Create(5));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_transient_release_failure_propagates() {
        let cache = make_cache(0, 0);
        cache.with_source(|s| s.fail_release.set(Some(3)));
        let scope = cache.get_entry(&3).unwrap();
        let err = scope.release().unwrap_err();
        assert!(err.is_release());
        assert_eq!(cache.stats().release_failures, 1);
    }

    #[test]
    fn test_sweep_release_failure_leaves_list_consistent() {
        let cache = make_cache(1, 3);
        let held: Vec<_> = (1..=3).map(|k| cache.get_entry(&k).unwrap()).collect();
        drop(held);
        assert_eq!(pooled_keys(&cache), vec![3, 2, 1]);
        cache.with_source(|s| s.fail_release.set(Some(1)));

        let err = cache.get_entry(&4).unwrap_err();
        assert!(err.is_release());
        // Both victims were unlinked and handed back, oldest first, even though
        // the first release failed. Nothing was created for 4.
        assert_eq!(released(&cache), vec![1, 2]);
        assert_eq!(pooled_keys(&cache), vec![3]);
        assert_eq!(cache.stats().evictions, 2);

        cache.with_source(|s| s.fail_release.set(None));
        let s = cache.get_entry(&4).unwrap();
        assert!(s.is_cached());
        assert_eq!(pooled_keys(&cache), vec![4, 3]);
    }

    #[test]
    fn test_entry_with_leaked_owner_counts_as_release_failure() {
        let mut segment = RefCountedSegment::init(
            RefCountedCacheConfig {
                soft_limit: 1,
                hard_limit: 1,
            },
            Numbers::default(),
        )
        .unwrap();
        let entry = segment.acquire(&5).unwrap();
        // Reference handed back, but an extra owner of the entry survives.
        let leaked = Arc::clone(&entry);
        segment.release(entry).unwrap();

        assert_eq!(segment.trim().unwrap(), 1);
        assert!(segment.source().released.borrow().is_empty());
        assert_eq!(segment.metrics().release_failures, 1);
        assert_eq!(segment.len(), 0);
        drop(leaked);
    }

    #[test]
    fn test_trim_evicts_all_idle() {
        let cache = make_cache(4, 4);
        let held = cache.get_entry(&1).unwrap();
        cache.get_entry(&2).unwrap();
        cache.get_entry(&3).unwrap();
        assert_eq!(cache.trim().unwrap(), 2);
        assert_eq!(pooled_keys(&cache), vec![1]);
        drop(held);
        assert_eq!(cache.trim().unwrap(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_drop_releases_pooled_entries() {
        let source = Rc::new(StdRefCell::new(Vec::new()));

        struct Tracking(Rc<StdRefCell<Vec<u32>>>);
        impl CacheSource for Tracking {
            type Key = u32;
            type Data = u32;
            type Object = ();
            type Error = core::convert::Infallible;

            fn create_entry(
                &self,
                key: &u32,
                _cached: bool,
            ) -> Result<(u32, ()), core::convert::Infallible> {
                Ok((*key, ()))
            }

            fn is_match(&self, key: &u32, entry: &CacheEntry<Self>) -> bool {
                entry.data() == key
            }

            fn release_entry(
                &self,
                entry: CacheEntry<Self>,
            ) -> Result<(), core::convert::Infallible> {
                self.0.borrow_mut().push(*entry.data());
                Ok(())
            }
        }

        {
            let cache = RefCountedCache::new(2, 2, Tracking(Rc::clone(&source))).unwrap();
            cache.get_entry(&1).unwrap();
            cache.get_entry(&2).unwrap();
        }
        assert_eq!(*source.borrow(), vec![2, 1]);
    }

    #[test]
    fn test_metrics_report() {
        let cache = make_cache(1, 1);
        let _a = cache.get_entry(&1).unwrap();
        let _b = cache.get_entry(&1).unwrap();
        let _c = cache.get_entry(&2).unwrap();

        let stats = cache.stats();
        assert_eq!(stats.requests, 3);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cached_creations, 1);
        assert_eq!(stats.transient_creations, 1);
        assert_eq!(stats.peak_cached, 1);

        let map = cache.metrics();
        assert_eq!(map["requests"], 3.0);
        assert_eq!(cache.algorithm_name(), "REFCOUNTED");
    }
}
