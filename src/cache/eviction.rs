//! Capacity Policy
//!
//! Chooses which entries to drop when the store grows past its bound.
//! Least valuable first: lowest hit count, then oldest insertion, then key.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{freshness, CacheEntry};

/// Keys of entries already expired by TTL, excluding `protected`.
pub fn expired_keys(
    entries: &HashMap<String, CacheEntry>,
    ttl: Option<Duration>,
    now: u64,
    protected: Option<&str>,
) -> Vec<String> {
    if ttl.is_none() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|(key, _)| Some(key.as_str()) != protected)
        .filter(|(_, entry)| freshness::is_expired(entry, ttl, now))
        .map(|(key, _)| key.clone())
        .collect()
}

/// Eviction order: fewer hits first, then older insertion, then key.
fn eviction_order(
    (key_a, a): &(&String, &CacheEntry),
    (key_b, b): &(&String, &CacheEntry),
) -> Ordering {
    a.hit_count
        .cmp(&b.hit_count)
        .then(a.inserted_at.cmp(&b.inserted_at))
        .then_with(|| key_a.cmp(key_b))
}

/// Returns up to `count` keys in eviction order, never `protected`.
///
/// Runs in linear time for the usual single victim and only sorts the
/// selected prefix otherwise.
pub fn select_victims(
    entries: &HashMap<String, CacheEntry>,
    count: usize,
    protected: Option<&str>,
) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }

    let candidates = entries
        .iter()
        .filter(|(key, _)| Some(key.as_str()) != protected);

    if count == 1 {
        return candidates
            .min_by(eviction_order)
            .map(|(key, _)| vec![key.clone()])
            .unwrap_or_default();
    }

    let mut candidates: Vec<(&String, &CacheEntry)> = candidates.collect();
    if count < candidates.len() {
        candidates.select_nth_unstable_by(count - 1, eviction_order);
        candidates.truncate(count);
    }
    candidates.sort_unstable_by(eviction_order);

    candidates
        .into_iter()
        .map(|(key, _)| key.clone())
        .collect()
}
