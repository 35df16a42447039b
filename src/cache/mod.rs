//! Cache Module
//!
//! Path metadata cache with TTL freshness, hit-count eviction and negative
//! caching behind a single lock.

mod entry;
mod eviction;
mod freshness;
mod lookup;
mod stat_cache;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry, EntryKind};
pub use freshness::{Freshness, Verdict};
pub use lookup::{LookupOptions, LookupResult, Retrieve};
pub use stat_cache::{MetaCache, StatCache};
pub use stats::CacheStats;
pub use store::{CacheSettings, CacheStore, DEFAULT_MAX_ENTRIES};
