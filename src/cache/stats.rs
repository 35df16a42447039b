//! Cache Statistics Module
//!
//! Tracks hits, misses, stale purges, evictions and negative hits.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing how well the cache is serving lookups.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a fresh positive entry
    pub hits: u64,
    /// Lookups that found nothing usable (absent, negative or stale)
    pub misses: u64,
    /// Entries purged because they failed the TTL or identity check
    pub stale: u64,
    /// Entries removed to satisfy the capacity bound
    pub evictions: u64,
    /// Negative-existence checks answered from the cache
    pub negative_hits: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Stale ==
    /// Increments the stale-purge counter.
    pub fn record_stale(&mut self) {
        self.stale += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Negative Hit ==
    /// Increments the negative-hit counter.
    pub fn record_negative_hit(&mut self) {
        self.negative_hits += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
