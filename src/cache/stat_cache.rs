//! Stat Cache Handle
//!
//! Thread-safe front for [`CacheStore`]. Every operation, configuration
//! included, runs under one mutex for its whole duration, so callers never
//! observe a partially updated entry and eviction never interleaves with an
//! insert.

use std::time::Duration;

use parking_lot::Mutex;
use tracing::info;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheSettings, CacheStats, CacheStore, Freshness, LookupOptions, LookupResult};
use crate::config::Config;
use crate::error::Result;
use crate::metadata::Headers;

// == Meta Cache Trait ==
/// Operations the filesystem layer needs from a metadata cache.
///
/// Callers depend on this trait rather than on the locking strategy, so a
/// sharded store could replace [`StatCache`] without touching them.
pub trait MetaCache: Send + Sync {
    /// Looks up `path`. Misses and stale purges are both errors that mean
    /// "fetch from the backend".
    fn lookup(&self, path: &str, options: &LookupOptions) -> Result<LookupResult>;

    /// Normalizes and stores metadata for `path`.
    fn insert(&self, path: &str, metadata: Headers, force_dir: bool) -> Result<()>;

    /// Records that `path` does not exist. False when negative caching is off.
    fn insert_no_object(&self, path: &str) -> bool;

    /// True for a fresh negative entry. `directory_fallback` consults the
    /// `path/` form first.
    fn is_no_object_cached(&self, path: &str, freshness: Freshness, directory_fallback: bool)
        -> bool;

    fn inc_size(&self, path: &str, delta: i64) -> Result<()>;

    fn delete(&self, path: &str) -> bool;

    /// Deletes `path` and its `name`/`name/` counterpart.
    fn delete_with_directory_alias(&self, path: &str) -> bool;

    fn clear(&self);

    fn len(&self) -> usize;

    fn stats(&self) -> CacheStats;

    fn max_entries(&self) -> usize;

    fn set_max_entries(&self, max_entries: usize) -> usize;

    fn ttl(&self) -> Option<Duration>;

    fn set_ttl(&self, ttl: Option<Duration>) -> Option<Duration>;

    fn cache_no_object(&self) -> bool;

    fn set_cache_no_object(&self, enabled: bool) -> bool;

    // == Provided ==
    /// Existence check without copying any data.
    fn has_stat(&self, path: &str, expected_etag: Option<&str>) -> bool {
        let mut options = LookupOptions::existence();
        options.expected_etag = expected_etag.map(str::to_string);
        self.lookup(path, &options).is_ok()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn unset_ttl(&self) -> Option<Duration> {
        self.set_ttl(None)
    }

    fn enable_cache_no_object(&self) -> bool {
        self.set_cache_no_object(true)
    }

    fn disable_cache_no_object(&self) -> bool {
        self.set_cache_no_object(false)
    }
}

// == Stat Cache ==
/// Single-lock metadata cache. Construct once and share it behind an `Arc`.
#[derive(Debug)]
pub struct StatCache {
    store: Mutex<CacheStore>,
}

impl StatCache {
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            store: Mutex::new(CacheStore::new(settings)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheSettings::from(config))
    }
}

impl Default for StatCache {
    fn default() -> Self {
        Self::new(CacheSettings::default())
    }
}

impl MetaCache for StatCache {
    fn lookup(&self, path: &str, options: &LookupOptions) -> Result<LookupResult> {
        self.store
            .lock()
            .lookup_at(path, options, current_timestamp_ms())
    }

    fn insert(&self, path: &str, metadata: Headers, force_dir: bool) -> Result<()> {
        self.store
            .lock()
            .insert_at(path, metadata, force_dir, current_timestamp_ms())
    }

    fn insert_no_object(&self, path: &str) -> bool {
        self.store
            .lock()
            .insert_no_object_at(path, current_timestamp_ms())
    }

    fn is_no_object_cached(
        &self,
        path: &str,
        freshness: Freshness,
        directory_fallback: bool,
    ) -> bool {
        self.store.lock().is_no_object_cached_at(
            path,
            freshness,
            directory_fallback,
            current_timestamp_ms(),
        )
    }

    fn inc_size(&self, path: &str, delta: i64) -> Result<()> {
        self.store.lock().inc_size(path, delta)
    }

    fn delete(&self, path: &str) -> bool {
        self.store.lock().delete(path)
    }

    fn delete_with_directory_alias(&self, path: &str) -> bool {
        self.store.lock().delete_with_directory_alias(path)
    }

    fn clear(&self) {
        self.store.lock().clear();
    }

    fn len(&self) -> usize {
        self.store.lock().len()
    }

    fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    fn max_entries(&self) -> usize {
        self.store.lock().max_entries()
    }

    fn set_max_entries(&self, max_entries: usize) -> usize {
        let previous = self
            .store
            .lock()
            .set_max_entries_at(max_entries, current_timestamp_ms());
        info!(previous, max_entries, "Stat cache size changed");
        previous
    }

    fn ttl(&self) -> Option<Duration> {
        self.store.lock().ttl()
    }

    fn set_ttl(&self, ttl: Option<Duration>) -> Option<Duration> {
        let previous = self.store.lock().set_ttl(ttl);
        info!(?previous, ?ttl, "Stat cache TTL changed");
        previous
    }

    fn cache_no_object(&self) -> bool {
        self.store.lock().cache_no_object()
    }

    fn set_cache_no_object(&self, enabled: bool) -> bool {
        let previous = self.store.lock().set_cache_no_object(enabled);
        info!(previous, enabled, "Negative caching toggled");
        previous
    }
}
