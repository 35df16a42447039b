//! Cache Entry Module
//!
//! Defines the per-path record held by the store: either the attributes and
//! raw metadata of an existing object, or a marker that the object is absent.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::metadata::{header_value, FileAttributes, Headers, ETAG};

// == Entry Kind ==
/// What a cache entry knows about its path.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    /// The object exists; attributes were derived from `metadata`.
    Positive {
        attributes: FileAttributes,
        metadata: Headers,
    },
    /// The backend confirmed the object does not exist.
    Negative,
}

// == Cache Entry ==
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub kind: EntryKind,
    /// Successful reads of this entry
    pub hit_count: u64,
    /// Insertion timestamp (Unix milliseconds), refreshed on overwrite
    pub inserted_at: u64,
    /// Directory type was forced by the caller rather than derived
    pub is_forced: bool,
}

impl CacheEntry {
    // == Constructors ==
    pub fn positive(
        attributes: FileAttributes,
        metadata: Headers,
        is_forced: bool,
        now: u64,
    ) -> Self {
        Self {
            kind: EntryKind::Positive {
                attributes,
                metadata,
            },
            hit_count: 0,
            inserted_at: now,
            is_forced,
        }
    }

    pub fn negative(now: u64) -> Self {
        Self {
            kind: EntryKind::Negative,
            hit_count: 0,
            inserted_at: now,
            is_forced: false,
        }
    }

    // == Accessors ==
    pub fn is_negative(&self) -> bool {
        matches!(self.kind, EntryKind::Negative)
    }

    pub fn attributes(&self) -> Option<&FileAttributes> {
        match &self.kind {
            EntryKind::Positive { attributes, .. } => Some(attributes),
            EntryKind::Negative => None,
        }
    }

    pub fn attributes_mut(&mut self) -> Option<&mut FileAttributes> {
        match &mut self.kind {
            EntryKind::Positive { attributes, .. } => Some(attributes),
            EntryKind::Negative => None,
        }
    }

    pub fn metadata(&self) -> Option<&Headers> {
        match &self.kind {
            EntryKind::Positive { metadata, .. } => Some(metadata),
            EntryKind::Negative => None,
        }
    }

    /// Identity token stored in the raw metadata, if any.
    pub fn etag(&self) -> Option<&str> {
        self.metadata().and_then(|meta| header_value(meta, ETAG))
    }

    /// Milliseconds since insertion; zero if the clock moved backwards.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.inserted_at)
    }

    pub fn record_hit(&mut self) {
        self.hit_count = self.hit_count.saturating_add(1);
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
