//! The contract a client implements to pool its resources.
//!
//! The cache knows nothing about what it pools. A [`CacheSource`] tells it how
//! to build an entry on a miss, whether an existing entry satisfies a lookup,
//! and how to dispose of an entry's resource once the cache lets go of it.

use crate::entry::CacheEntry;

/// Creation, matching and disposal rules for a
/// [`RefCountedCache`](crate::RefCountedCache).
///
/// Lookup is a linear scan driven by [`is_match`](CacheSource::is_match), not a
/// hash probe, so `Key` does not have to equal `Data`: an integer key can be
/// matched against a projection of a richer payload.
///
/// # Examples
///
/// A pool of brushes keyed by a packed `0xRRGGBB` colour:
///
/// ```
/// use core::convert::Infallible;
/// use refcounted_cache::{CacheEntry, CacheSource};
///
/// struct Rgb { r: u8, g: u8, b: u8 }
/// struct Brush(u32);
///
/// struct Brushes;
///
/// impl CacheSource for Brushes {
///     type Key = u32;
///     type Data = Rgb;
///     type Object = Brush;
///     type Error = Infallible;
///
///     fn create_entry(&self, key: &u32, _cached: bool) -> Result<(Rgb, Brush), Infallible> {
///         let rgb = Rgb { r: (key >> 16) as u8, g: (key >> 8) as u8, b: *key as u8 };
///         Ok((rgb, Brush(*key)))
///     }
///
///     fn is_match(&self, key: &u32, entry: &CacheEntry<Self>) -> bool {
///         let rgb = entry.data();
///         (u32::from(rgb.r) << 16 | u32::from(rgb.g) << 8 | u32::from(rgb.b)) == *key
///     }
/// }
/// ```
pub trait CacheSource {
    /// Lookup key.
    type Key: ?Sized;
    /// Identity payload stored in each entry.
    type Data;
    /// Resource handed out to scopes.
    type Object;
    /// Failure raised while creating or releasing an entry.
    type Error: std::error::Error + 'static;

    /// Builds the payload and resource for a new entry.
    ///
    /// `cached` is `false` when the cache is at its hard limit and the entry
    /// will live only as long as the scope that requested it.
    fn create_entry(
        &self,
        key: &Self::Key,
        cached: bool,
    ) -> Result<(Self::Data, Self::Object), Self::Error>;

    /// Returns `true` if `entry` satisfies a lookup for `key`.
    fn is_match(&self, key: &Self::Key, entry: &CacheEntry<Self>) -> bool;

    /// Disposes of an entry the cache no longer tracks.
    ///
    /// Called after the entry has been unlinked, either by an eviction sweep or
    /// when the last scope of a transient entry is released. The default
    /// implementation drops the entry.
    fn release_entry(&self, entry: CacheEntry<Self>) -> Result<(), Self::Error> {
        drop(entry);
        Ok(())
    }
}
