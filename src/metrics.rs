//! Cache Metrics
//!
//! Counters for the reference-counted cache, reported through the
//! [`CacheMetrics`] trait as a `BTreeMap` so output ordering is deterministic
//! across runs.

use std::collections::BTreeMap;

/// Counters tracked by a [`RefCountedCache`](crate::RefCountedCache).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RefCountedCacheMetrics {
    /// Total number of `get_entry` calls.
    pub requests: u64,

    /// Requests satisfied by an existing pooled entry.
    pub cache_hits: u64,

    /// Misses that created a pooled entry.
    pub cached_creations: u64,

    /// Misses served by a transient entry because the hard limit was reached.
    pub transient_creations: u64,

    /// Idle pooled entries removed by an eviction sweep or a trim.
    pub evictions: u64,

    /// Transient entries released when their last scope ended.
    pub transient_disposals: u64,

    /// `release_entry` calls that reported an error.
    pub release_failures: u64,

    /// Largest number of pooled entries observed at once.
    pub peak_cached: u64,
}

impl RefCountedCacheMetrics {
    /// Creates zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found a pooled entry.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that found nothing.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a new pooled entry; `resident` is the pooled count after insertion.
    pub fn record_cached_creation(&mut self, resident: usize) {
        self.cached_creations += 1;
        self.peak_cached = self.peak_cached.max(resident as u64);
    }

    /// Records a new transient entry.
    pub fn record_transient_creation(&mut self) {
        self.transient_creations += 1;
    }

    /// Records an idle pooled entry being evicted.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records a transient entry being released.
    pub fn record_transient_disposal(&mut self) {
        self.transient_disposals += 1;
    }

    /// Records a failed `release_entry`.
    pub fn record_release_failure(&mut self) {
        self.release_failures += 1;
    }

    /// Number of requests that missed.
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Fraction of requests served by a pooled entry, between 0.0 and 1.0.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of requests that missed, between 0.0 and 1.0.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of misses that had to fall back to a transient entry.
    pub fn transient_rate(&self) -> f64 {
        let misses = self.cache_misses();
        if misses > 0 {
            self.transient_creations as f64 / misses as f64
        } else {
            0.0
        }
    }

    /// Converts the counters to a `BTreeMap` for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("cached_creations".to_string(), self.cached_creations as f64);
        metrics.insert(
            "transient_creations".to_string(),
            self.transient_creations as f64,
        );
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert(
            "transient_disposals".to_string(),
            self.transient_disposals as f64,
        );
        metrics.insert("release_failures".to_string(), self.release_failures as f64);
        metrics.insert("peak_cached".to_string(), self.peak_cached as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());
        metrics.insert("transient_rate".to_string(), self.transient_rate());

        metrics
    }
}

/// Uniform metrics reporting for cache implementations.
///
/// Keys are sorted alphabetically for consistent output.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Short identifier of the cache algorithm.
    fn algorithm_name(&self) -> &'static str;
}

impl CacheMetrics for RefCountedCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "REFCOUNTED"
    }
}
