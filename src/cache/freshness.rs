//! Freshness Policy
//!
//! Decides whether a stored entry may still be served: TTL age first, then
//! the caller's identity token against the stored etag.

use std::time::Duration;

use crate::cache::CacheEntry;

// == Freshness Mode ==
/// Whether a lookup applies the TTL check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Freshness {
    #[default]
    Validate,
    /// Trust the entry regardless of age, e.g. right after writing it.
    Skip,
}

// == Verdict ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Fresh,
    Expired,
    IdentityMismatch,
}

impl Verdict {
    pub fn is_fresh(self) -> bool {
        self == Verdict::Fresh
    }
}

/// True once `now - inserted_at` has reached the TTL. No TTL never expires.
pub fn is_expired(entry: &CacheEntry, ttl: Option<Duration>, now: u64) -> bool {
    match ttl {
        Some(ttl) => u128::from(entry.age_ms(now)) >= ttl.as_millis(),
        None => false,
    }
}

/// Evaluates an entry for a lookup.
///
/// The identity check only applies to positive entries; an entry without an
/// etag never matches a supplied token.
pub fn evaluate(
    entry: &CacheEntry,
    freshness: Freshness,
    ttl: Option<Duration>,
    expected_etag: Option<&str>,
    now: u64,
) -> Verdict {
    if freshness == Freshness::Validate && is_expired(entry, ttl, now) {
        return Verdict::Expired;
    }

    match expected_etag {
        Some(expected) if !entry.is_negative() && entry.etag() != Some(expected) => {
            Verdict::IdentityMismatch
        }
        _ => Verdict::Fresh,
    }
}
