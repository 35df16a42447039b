//! Cache Store Module
//!
//! The unsynchronized entry store: path map plus the freshness, capacity and
//! negative-cache policies. Time-dependent operations take `now` in Unix
//! milliseconds; [`StatCache`](crate::cache::StatCache) supplies the clock
//! and the lock.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::cache::freshness::{self, Freshness, Verdict};
use crate::cache::{eviction, CacheEntry, CacheStats, LookupOptions, LookupResult};
use crate::error::{CacheError, Result};
use crate::metadata::{Headers, MetadataNormalizer};

/// Default entry bound, matching the usual stat cache size of object-store
/// filesystems.
pub const DEFAULT_MAX_ENTRIES: usize = 100_000;

// == Cache Settings ==
/// Policy configuration applied when a store is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Maximum entry count, 0 = unbounded
    pub max_entries: usize,
    /// Entry lifetime, None = never expire by age
    pub ttl: Option<Duration>,
    /// Whether "object does not exist" results are cached
    pub cache_no_object: bool,
    pub normalizer: MetadataNormalizer,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: None,
            cache_no_object: false,
            normalizer: MetadataNormalizer::default(),
        }
    }
}

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
    max_entries: usize,
    ttl: Option<Duration>,
    cache_no_object: bool,
    normalizer: MetadataNormalizer,
}

impl CacheStore {
    // == Constructor ==
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_entries: settings.max_entries,
            ttl: settings.ttl,
            cache_no_object: settings.cache_no_object,
            normalizer: settings.normalizer,
        }
    }

    // == Lookup ==
    /// Looks up `path`, applying the freshness and identity checks.
    ///
    /// Stale entries are purged and reported as [`CacheError::Stale`];
    /// absent and negative entries as [`CacheError::NotFound`]. A hit bumps
    /// the entry's hit count and nothing else.
    pub fn lookup_at(
        &mut self,
        path: &str,
        options: &LookupOptions,
        now: u64,
    ) -> Result<LookupResult> {
        let Some(key) = self.resolve_key(path, options.directory_fallback) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(path.to_string()));
        };

        let (verdict, is_negative) = match self.entries.get(&key) {
            Some(entry) => (
                freshness::evaluate(entry, options.freshness, self.ttl, options.etag(), now),
                entry.is_negative(),
            ),
            None => {
                self.stats.record_miss();
                return Err(CacheError::NotFound(path.to_string()));
            }
        };

        if !verdict.is_fresh() {
            self.purge_stale(&key, verdict);
            self.stats.record_miss();
            return Err(CacheError::Stale(key));
        }

        if is_negative {
            // Negative entries outlive a disabled negative cache only until
            // the next access finds them.
            if !self.cache_no_object {
                self.remove(&key);
            }
            self.stats.record_miss();
            return Err(CacheError::NotFound(path.to_string()));
        }

        let Some(entry) = self.entries.get_mut(&key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(path.to_string()));
        };
        entry.record_hit();
        self.stats.record_hit();
        trace!(path = %key, hits = entry.hit_count, "Stat cache hit");

        let retrieve = options.retrieve;
        Ok(LookupResult {
            attributes: entry
                .attributes()
                .filter(|_| retrieve.attributes())
                .cloned(),
            metadata: entry.metadata().filter(|_| retrieve.metadata()).cloned(),
            is_forced: entry.is_forced,
            path: key,
        })
    }

    /// Existing key to consult for `path`, preferring the directory form.
    fn resolve_key(&self, path: &str, directory_fallback: bool) -> Option<String> {
        if directory_fallback && !path.ends_with('/') {
            let dir_key = format!("{path}/");
            if self.entries.contains_key(&dir_key) {
                return Some(dir_key);
            }
        }
        self.entries
            .contains_key(path)
            .then(|| path.to_string())
    }

    fn purge_stale(&mut self, key: &str, verdict: Verdict) {
        if self.remove(key).is_some() {
            self.stats.record_stale();
            debug!(path = %key, ?verdict, "Purged stale stat cache entry");
        }
    }

    // == Insert ==
    /// Normalizes `metadata` and stores it under `path`, replacing any prior
    /// entry (negative ones included), then enforces the capacity bound.
    ///
    /// On normalization failure the prior entry is left untouched.
    pub fn insert_at(
        &mut self,
        path: &str,
        metadata: Headers,
        force_dir: bool,
        now: u64,
    ) -> Result<()> {
        let fallback_mtime = DateTime::<Utc>::from_timestamp_millis(now as i64).unwrap_or_default();
        let attributes = self
            .normalizer
            .convert(path, &metadata, force_dir, fallback_mtime)?;

        self.entries.insert(
            path.to_string(),
            CacheEntry::positive(attributes, metadata, force_dir, now),
        );
        self.enforce_capacity(Some(path), now);
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    // == Negative Cache ==
    /// Records that `path` does not exist. Returns false, storing nothing,
    /// when negative caching is disabled.
    pub fn insert_no_object_at(&mut self, path: &str, now: u64) -> bool {
        if !self.cache_no_object {
            return false;
        }

        self.entries
            .insert(path.to_string(), CacheEntry::negative(now));
        self.enforce_capacity(Some(path), now);
        self.stats.set_total_entries(self.entries.len());
        debug!(path = %path, "Cached missing object");
        true
    }

    /// True only when a usable negative entry exists for `path`.
    ///
    /// With `directory_fallback` the directory form `path/` is consulted
    /// first, as for lookups. A positive entry never satisfies this check.
    /// With negative caching disabled the answer is always false.
    pub fn is_no_object_cached_at(
        &mut self,
        path: &str,
        freshness: Freshness,
        directory_fallback: bool,
        now: u64,
    ) -> bool {
        if !self.cache_no_object {
            return false;
        }

        let Some(key) = self.resolve_key(path, directory_fallback) else {
            return false;
        };
        let expired = match self.entries.get(&key) {
            Some(entry) if entry.is_negative() => {
                freshness == Freshness::Validate && freshness::is_expired(entry, self.ttl, now)
            }
            _ => return false,
        };

        if expired {
            self.purge_stale(&key, Verdict::Expired);
            return false;
        }

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.record_hit();
        }
        self.stats.record_negative_hit();
        true
    }

    // == Size Adjustment ==
    /// Adds `delta` to the cached size of a positive entry without touching
    /// its insertion time or hit count.
    pub fn inc_size(&mut self, path: &str, delta: i64) -> Result<()> {
        let entry = self
            .entries
            .get_mut(path)
            .ok_or_else(|| CacheError::NotFound(path.to_string()))?;
        let attributes = entry
            .attributes_mut()
            .ok_or_else(|| CacheError::NotApplicable(path.to_string()))?;

        attributes.adjust_size(delta);
        trace!(path = %path, delta, size = attributes.size, "Adjusted cached size");
        Ok(())
    }

    // == Delete ==
    /// Removes the entry for `path`, negative or not. Returns whether
    /// anything was removed; deleting an absent path changes nothing.
    pub fn delete(&mut self, path: &str) -> bool {
        self.remove(path).is_some()
    }

    /// Removes `path` together with its alternate directory form (`name` and
    /// `name/`), for callers that deleted an object whose key shape they do
    /// not know. The root `/` has no alternate form.
    pub fn delete_with_directory_alias(&mut self, path: &str) -> bool {
        let mut removed = self.delete(path);

        if let Some(alternate) = directory_alias(path) {
            removed |= self.delete(&alternate);
        }
        removed
    }

    // == Clear ==
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.set_total_entries(0);
        debug!(count, "Cleared stat cache");
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let removed = self.entries.remove(key);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Capacity ==
    /// Brings the entry count back within `max_entries`.
    ///
    /// Entries already expired by TTL go first, then the least valuable
    /// entries. `protected` is never removed. Returns the number removed.
    fn enforce_capacity(&mut self, protected: Option<&str>, now: u64) -> usize {
        if self.max_entries == 0 || self.entries.len() <= self.max_entries {
            return 0;
        }

        let mut removed = 0;
        for key in eviction::expired_keys(&self.entries, self.ttl, now, protected) {
            if self.entries.remove(&key).is_some() {
                self.stats.record_stale();
                removed += 1;
            }
        }

        let excess = self.entries.len().saturating_sub(self.max_entries);
        for key in eviction::select_victims(&self.entries, excess, protected) {
            if self.entries.remove(&key).is_some() {
                self.stats.record_eviction();
                debug!(path = %key, "Evicted stat cache entry");
                removed += 1;
            }
        }

        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Configuration ==
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Sets the entry bound and evicts immediately if the store is now over
    /// it. Returns the previous bound.
    pub fn set_max_entries_at(&mut self, max_entries: usize, now: u64) -> usize {
        let previous = std::mem::replace(&mut self.max_entries, max_entries);
        let removed = self.enforce_capacity(None, now);
        if removed > 0 {
            debug!(removed, max_entries, "Shrunk stat cache to new bound");
        }
        previous
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Sets or clears the TTL. Returns the previous TTL.
    pub fn set_ttl(&mut self, ttl: Option<Duration>) -> Option<Duration> {
        std::mem::replace(&mut self.ttl, ttl)
    }

    pub fn cache_no_object(&self) -> bool {
        self.cache_no_object
    }

    /// Enables or disables negative caching. Returns the previous flag.
    pub fn set_cache_no_object(&mut self, enabled: bool) -> bool {
        std::mem::replace(&mut self.cache_no_object, enabled)
    }

    pub fn normalizer(&self) -> &MetadataNormalizer {
        &self.normalizer
    }

    // == Introspection ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Borrows the raw entry without counting a hit or checking freshness.
    pub fn peek(&self, path: &str) -> Option<&CacheEntry> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `name/` for `name` and back; None for the root and the empty path.
fn directory_alias(path: &str) -> Option<String> {
    if path.is_empty() || path == "/" {
        return None;
    }
    Some(match path.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => format!("{path}/"),
    })
}
