//! Released-once handles on cache entries.
//!
//! A [`Scope`] is one live reference to a cache entry. It is a move-only RAII
//! guard: dropping it gives the reference back, and [`Scope::release`] does the
//! same while reporting disposal failures. `release` consumes the guard, so a
//! scope cannot be released twice.
//!
//! Scopes borrow the cache that produced them, so the cache outlives every
//! scope. Nested or overlapping scopes on the same key are fine; each holds its
//! own reference.

use crate::entry::CacheEntry;
use crate::error::CacheError;
use crate::source::CacheSource;
use core::fmt;
use core::ops::Deref;
use std::sync::Arc;

/// A cache that can take back the references its scopes hold.
///
/// Implemented by [`RefCountedCache`](crate::RefCountedCache) and, with the
/// `concurrent` feature, [`ConcurrentRefCountedCache`](crate::ConcurrentRefCountedCache).
pub trait ScopeOwner {
    /// The source whose entries this cache pools.
    type Source: CacheSource;

    /// Gives back one reference to `entry`.
    ///
    /// # Errors
    ///
    /// [`CacheError::Release`] if this was the last reference to a transient
    /// entry and the source failed to release it.
    fn release_entry(
        &self,
        entry: Arc<CacheEntry<Self::Source>>,
    ) -> Result<(), CacheError<<Self::Source as CacheSource>::Error>>;
}

/// One live reference to a pooled (or transient) cache entry.
///
/// Dereferences to the entry's object.
///
/// # Examples
///
/// ```
/// use core::convert::Infallible;
/// use refcounted_cache::{CacheEntry, CacheSource, RefCountedCache};
///
/// struct Squares;
///
/// impl CacheSource for Squares {
///     type Key = u64;
///     type Data = u64;
///     type Object = u64;
///     type Error = Infallible;
///
///     fn create_entry(&self, key: &u64, _cached: bool) -> Result<(u64, u64), Infallible> {
///         Ok((*key, key * key))
///     }
///
///     fn is_match(&self, key: &u64, entry: &CacheEntry<Self>) -> bool {
///         entry.data() == key
///     }
/// }
///
/// let cache = RefCountedCache::new(1, 2, Squares).unwrap();
/// {
///     let nine = cache.get_entry(&3).unwrap();
///     assert_eq!(*nine, 9);
///     assert_eq!(nine.ref_count(), 1);
/// }
/// // Released, but still pooled for the next caller.
/// assert_eq!(cache.idle_count(), 1);
/// ```
pub struct Scope<'c, C: ScopeOwner + ?Sized> {
    owner: &'c C,
    /// `None` once the reference has been handed back.
    entry: Option<Arc<CacheEntry<C::Source>>>,
}

impl<'c, C: ScopeOwner + ?Sized> Scope<'c, C> {
    pub(crate) fn new(owner: &'c C, entry: Arc<CacheEntry<C::Source>>) -> Self {
        Scope {
            owner,
            entry: Some(entry),
        }
    }

    fn entry(&self) -> &CacheEntry<C::Source> {
        match &self.entry {
            Some(entry) => entry,
            None => unreachable!("scope accessed after release"),
        }
    }

    /// The pooled resource.
    pub fn object(&self) -> &<C::Source as CacheSource>::Object {
        self.entry().object()
    }

    /// The identity payload of the entry.
    pub fn data(&self) -> &<C::Source as CacheSource>::Data {
        self.entry().data()
    }

    /// Number of live scopes on this entry, this one included.
    pub fn ref_count(&self) -> usize {
        self.entry().ref_count()
    }

    /// Whether the entry is pooled (`true`) or transient (`false`).
    pub fn is_cached(&self) -> bool {
        self.entry().is_cached()
    }

    /// Gives the reference back to the cache.
    ///
    /// Equivalent to dropping the scope, except that a failure to release a
    /// transient entry is returned instead of logged.
    ///
    /// # Errors
    ///
    /// [`CacheError::Release`] if the source failed to release the entry.
    pub fn release(mut self) -> Result<(), CacheError<<C::Source as CacheSource>::Error>> {
        match self.entry.take() {
            Some(entry) => self.owner.release_entry(entry),
            None => Ok(()),
        }
    }
}

impl<C: ScopeOwner + ?Sized> Deref for Scope<'_, C> {
    type Target = <C::Source as CacheSource>::Object;

    fn deref(&self) -> &Self::Target {
        self.object()
    }
}

impl<C: ScopeOwner + ?Sized> Drop for Scope<'_, C> {
    fn drop(&mut self) {
        if let Some(entry) = self.entry.take() {
            if let Err(err) = self.owner.release_entry(entry) {
                log::warn!("failed to release cache entry on scope drop: {err}");
            }
        }
    }
}

impl<C: ScopeOwner + ?Sized> fmt::Debug for Scope<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Scope");
        if let Some(entry) = &self.entry {
            dbg.field("ref_count", &entry.ref_count())
                .field("cached", &entry.is_cached());
        }
        dbg.finish()
    }
}
