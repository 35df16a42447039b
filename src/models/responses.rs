//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Generic acknowledgement for mutating endpoints
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub path: String,
}

impl MessageResponse {
    pub fn new(path: impl Into<String>, action: &str) -> Self {
        let path = path.into();
        Self {
            message: format!("Path '{}' {}", path, action),
            path,
        }
    }
}

/// Response body for DELETE /stat/*path
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub path: String,
    /// False when nothing was cached; deleting is still a success
    pub removed: bool,
}

impl DeleteResponse {
    pub fn new(path: impl Into<String>, removed: bool) -> Self {
        Self {
            path: path.into(),
            removed,
        }
    }
}

/// Response body for the negative-cache endpoints
#[derive(Debug, Clone, Serialize)]
pub struct NoObjectResponse {
    pub path: String,
    /// Whether the path is (now) cached as missing
    pub cached: bool,
}

impl NoObjectResponse {
    pub fn new(path: impl Into<String>, cached: bool) -> Self {
        Self {
            path: path.into(),
            cached,
        }
    }
}

/// Response body for GET/PUT /config
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigResponse {
    pub max_entries: usize,
    /// None when entries never expire by age
    pub ttl_secs: Option<u64>,
    pub cache_no_object: bool,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub stale: u64,
    pub evictions: u64,
    pub negative_hits: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            stale: stats.stale,
            evictions: stats.evictions,
            negative_hits: stats.negative_hits,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
