//! Reference-counted cache entry.
//!
//! A [`CacheEntry`] pairs the client's identity payload (`Data`) with the
//! resource handed to callers (`Object`), plus the bookkeeping the cache needs:
//! how many live [`Scope`](crate::Scope)s point at it and whether it is linked
//! into the recency list.
//!
//! # Memory Layout
//!
//! - `data: S::Data` - client identity payload, immutable after construction
//! - `object: S::Object` - the pooled resource
//! - `ref_count: AtomicUsize` - 8 bytes
//! - `cached: bool` - 1 byte (+ padding)
//!
//! Entries are shared between the cache's list and its scopes through `Arc`.
//! The reference count is atomic so that scopes of a
//! [`ConcurrentRefCountedCache`](crate::ConcurrentRefCountedCache) may read it
//! from any thread, but it is only ever written by the owning cache while it
//! holds exclusive access to its state.

use crate::source::CacheSource;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

/// One pooled resource and its reference count.
///
/// `cached == false` marks a transient entry: it was created while the cache
/// was at its hard limit, is never linked into the recency list, and is
/// released as soon as its last scope goes away. Cached entries stay pooled at
/// a reference count of zero until an eviction sweep reclaims them.
pub struct CacheEntry<S: CacheSource + ?Sized> {
    data: S::Data,
    object: S::Object,
    ref_count: AtomicUsize,
    cached: bool,
}

impl<S: CacheSource + ?Sized> CacheEntry<S> {
    /// Creates an unreferenced entry.
    pub(crate) fn new(data: S::Data, object: S::Object, cached: bool) -> Self {
        CacheEntry {
            data,
            object,
            ref_count: AtomicUsize::new(0),
            cached,
        }
    }

    /// The identity payload the entry was created from.
    #[inline]
    pub fn data(&self) -> &S::Data {
        &self.data
    }

    /// The resource exposed to callers.
    #[inline]
    pub fn object(&self) -> &S::Object {
        &self.object
    }

    /// Number of live scopes referencing this entry.
    #[inline]
    pub fn ref_count(&self) -> usize {
        self.ref_count.load(Ordering::Relaxed)
    }

    /// Whether the entry is pooled in the cache's recency list.
    #[inline]
    pub fn is_cached(&self) -> bool {
        self.cached
    }

    /// Whether no scope currently references the entry.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.ref_count() == 0
    }

    /// Splits the entry into its payload and resource.
    pub fn into_parts(self) -> (S::Data, S::Object) {
        (self.data, self.object)
    }

    /// Adds one reference and returns the new count.
    pub(crate) fn retain(&self) -> usize {
        self.ref_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Drops one reference and returns the new count.
    pub(crate) fn release_ref(&self) -> usize {
        let previous = self.ref_count.fetch_sub(1, Ordering::Relaxed);
        debug_assert!(previous > 0, "cache entry reference count underflow");
        previous - 1
    }
}

impl<S> fmt::Debug for CacheEntry<S>
where
    S: CacheSource + ?Sized,
    S::Data: fmt::Debug,
    S::Object: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("data", &self.data)
            .field("object", &self.object)
            .field("ref_count", &self.ref_count())
            .field("cached", &self.cached)
            .finish()
    }
}
