//! Stat Cache - path metadata cache for object-storage filesystems
//!
//! Answers stat and existence lookups locally with TTL freshness, bounded
//! hit-count eviction and optional negative caching.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metadata;
pub mod models;

pub use api::AppState;
pub use cache::{LookupOptions, MetaCache, StatCache};
pub use config::Config;
pub use metadata::convert_header_to_stat;
