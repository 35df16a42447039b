//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::cache::{Freshness, LookupOptions, Retrieve};
use crate::metadata::Headers;

/// Longest object path accepted by the admin API
pub const MAX_PATH_LENGTH: usize = 4096;

/// Validates an object path taken from the URL.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_path(path: &str) -> Option<String> {
    if path.is_empty() {
        return Some("Path cannot be empty".to_string());
    }
    if path.len() > MAX_PATH_LENGTH {
        return Some(format!(
            "Path exceeds maximum length of {} bytes",
            MAX_PATH_LENGTH
        ));
    }
    None
}

/// Query string for GET /stat/*path
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupQuery {
    /// Expected etag; a mismatch purges the entry
    #[serde(default)]
    pub etag: Option<String>,
    #[serde(default)]
    pub skip_freshness: bool,
    #[serde(default)]
    pub directory_fallback: bool,
    /// Return raw metadata alongside attributes
    #[serde(default)]
    pub with_metadata: bool,
}

impl LookupQuery {
    pub fn to_options(&self) -> LookupOptions {
        LookupOptions {
            retrieve: if self.with_metadata {
                Retrieve::Both
            } else {
                Retrieve::Attributes
            },
            freshness: if self.skip_freshness {
                Freshness::Skip
            } else {
                Freshness::Validate
            },
            expected_etag: self.etag.clone(),
            directory_fallback: self.directory_fallback,
        }
    }
}

/// Query string for DELETE /stat/*path
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteQuery {
    /// Also remove the `name`/`name/` counterpart
    #[serde(default)]
    pub directory_alias: bool,
}

/// Query string for GET /noobj/*path
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoObjectQuery {
    #[serde(default)]
    pub directory_fallback: bool,
}

/// Request body for PUT /stat/*path
#[derive(Debug, Clone, Deserialize)]
pub struct InsertStatRequest {
    /// Raw object metadata as returned by the backend
    pub metadata: Headers,
    /// Force the entry to describe a directory
    #[serde(default)]
    pub force_dir: bool,
}

/// Request body for POST /size/*path
#[derive(Debug, Clone, Deserialize)]
pub struct IncSizeRequest {
    pub delta: i64,
}

/// Request body for PUT /config; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigUpdateRequest {
    #[serde(default)]
    pub max_entries: Option<usize>,
    #[serde(default)]
    pub ttl_secs: Option<u64>,
    /// Disable the TTL entirely
    #[serde(default)]
    pub clear_ttl: bool,
    #[serde(default)]
    pub cache_no_object: Option<bool>,
}

impl ConfigUpdateRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.clear_ttl && self.ttl_secs.is_some() {
            return Some("ttl_secs and clear_ttl are mutually exclusive".to_string());
        }
        if self.ttl_secs == Some(0) {
            return Some("ttl_secs must be positive, use clear_ttl to disable".to_string());
        }
        None
    }
}
