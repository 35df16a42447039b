//! Error types for the stat cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::metadata::MetadataError;
use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for cache operations and the admin API.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No entry for the path
    #[error("Path not cached: {0}")]
    NotFound(String),

    /// Entry existed but failed the TTL or identity check and was purged
    #[error("Stale entry purged: {0}")]
    Stale(String),

    /// Metadata could not be normalized; the prior entry is untouched
    #[error("Malformed metadata: {0}")]
    MalformedMetadata(#[from] MetadataError),

    /// Operation does not apply to the kind of entry cached for the path
    #[error("Not applicable to cached entry: {0}")]
    NotApplicable(String),

    /// Invalid admin request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Miss and Stale both mean "go to the backend".
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::NotFound(_) | CacheError::Stale(_))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) | CacheError::Stale(_) => StatusCode::NOT_FOUND,
            CacheError::MalformedMetadata(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::NotApplicable(_) => StatusCode::CONFLICT,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the stat cache.
pub type Result<T> = std::result::Result<T, CacheError>;
