//! API Handlers
//!
//! HTTP request handlers for the admin endpoints. Each handler performs one
//! synchronous cache operation; the cache lock is never held across an await.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{Freshness, LookupResult, MetaCache, StatCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_path, ConfigResponse, ConfigUpdateRequest, DeleteQuery, DeleteResponse,
    HealthResponse, IncSizeRequest, InsertStatRequest, LookupQuery, MessageResponse,
    NoObjectQuery, NoObjectResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn MetaCache>,
}

impl AppState {
    pub fn new(cache: Arc<dyn MetaCache>) -> Self {
        Self { cache }
    }

    /// Creates the process-wide stat cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(StatCache::from_config(config)))
    }
}

/// Turns the wildcard capture into an absolute object path.
fn object_path(raw: String) -> Result<String> {
    let path = if raw.starts_with('/') {
        raw
    } else {
        format!("/{raw}")
    };
    match validate_path(&path) {
        Some(msg) => Err(CacheError::InvalidRequest(msg)),
        None => Ok(path),
    }
}

fn config_snapshot(cache: &dyn MetaCache) -> ConfigResponse {
    ConfigResponse {
        max_entries: cache.max_entries(),
        ttl_secs: cache.ttl().map(|ttl| ttl.as_secs()),
        cache_no_object: cache.cache_no_object(),
    }
}

/// Handler for GET /stat/*path
pub async fn lookup_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupResult>> {
    let path = object_path(path)?;
    let result = state.cache.lookup(&path, &query.to_options())?;
    Ok(Json(result))
}

/// Handler for PUT /stat/*path
pub async fn insert_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Json(req): Json<InsertStatRequest>,
) -> Result<Json<MessageResponse>> {
    let path = object_path(path)?;
    state.cache.insert(&path, req.metadata, req.force_dir)?;
    Ok(Json(MessageResponse::new(path, "cached")))
}

/// Handler for DELETE /stat/*path
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeleteResponse>> {
    let path = object_path(path)?;
    let removed = if query.directory_alias {
        state.cache.delete_with_directory_alias(&path)
    } else {
        state.cache.delete(&path)
    };
    Ok(Json(DeleteResponse::new(path, removed)))
}

/// Handler for POST /size/*path
pub async fn inc_size_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Json(req): Json<IncSizeRequest>,
) -> Result<Json<MessageResponse>> {
    let path = object_path(path)?;
    state.cache.inc_size(&path, req.delta)?;
    Ok(Json(MessageResponse::new(path, "resized")))
}

/// Handler for PUT /noobj/*path
pub async fn insert_no_object_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<NoObjectResponse>> {
    let path = object_path(path)?;
    let cached = state.cache.insert_no_object(&path);
    Ok(Json(NoObjectResponse::new(path, cached)))
}

/// Handler for GET /noobj/*path
pub async fn no_object_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<NoObjectQuery>,
) -> Result<Json<NoObjectResponse>> {
    let path = object_path(path)?;
    let cached = state
        .cache
        .is_no_object_cached(&path, Freshness::Validate, query.directory_fallback);
    Ok(Json(NoObjectResponse::new(path, cached)))
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.clear();
    Json(MessageResponse::new("/", "cleared"))
}

/// Handler for GET /config
pub async fn config_handler(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(config_snapshot(state.cache.as_ref()))
}

/// Handler for PUT /config
pub async fn update_config_handler(
    State(state): State<AppState>,
    Json(req): Json<ConfigUpdateRequest>,
) -> Result<Json<ConfigResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    if let Some(max_entries) = req.max_entries {
        state.cache.set_max_entries(max_entries);
    }
    if req.clear_ttl {
        state.cache.unset_ttl();
    } else if let Some(ttl_secs) = req.ttl_secs {
        state.cache.set_ttl(Some(Duration::from_secs(ttl_secs)));
    }
    if let Some(enabled) = req.cache_no_object {
        state.cache.set_cache_no_object(enabled);
    }

    Ok(Json(config_snapshot(state.cache.as_ref())))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Headers;

    fn state() -> AppState {
        AppState::from_config(&Config {
            max_entries: 100,
            ttl_secs: 300,
            cache_no_object: true,
            ..Config::default()
        })
    }

    fn insert_request(size: &str) -> InsertStatRequest {
        let mut metadata = Headers::new();
        metadata.insert("Content-Length".to_string(), size.to_string());
        metadata.insert("ETag".to_string(), "e1".to_string());
        InsertStatRequest {
            metadata,
            force_dir: false,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup_handler() {
        let state = state();

        let result = insert_handler(
            State(state.clone()),
            Path("dir/file".to_string()),
            Json(insert_request("42")),
        )
        .await;
        assert!(result.is_ok());

        let response = lookup_handler(
            State(state),
            Path("dir/file".to_string()),
            Query(LookupQuery::default()),
        )
        .await
        .unwrap();
        assert_eq!(response.path, "/dir/file");
        assert_eq!(response.attributes.as_ref().unwrap().size, 42);
    }

    #[tokio::test]
    async fn test_lookup_missing() {
        let result = lookup_handler(
            State(state()),
            Path("nope".to_string()),
            Query(LookupQuery::default()),
        )
        .await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler_idempotent() {
        let state = state();
        let inserted = insert_handler(
            State(state.clone()),
            Path("f".to_string()),
            Json(insert_request("1")),
        )
        .await
        .unwrap();
        assert_eq!(inserted.path, "/f");

        let first = delete_handler(
            State(state.clone()),
            Path("f".to_string()),
            Query(DeleteQuery::default()),
        )
        .await
        .unwrap();
        assert!(first.removed);

        let second = delete_handler(
            State(state),
            Path("f".to_string()),
            Query(DeleteQuery::default()),
        )
        .await
        .unwrap();
        assert!(!second.removed);
    }

    #[tokio::test]
    async fn test_delete_handler_directory_alias() {
        let state = state();
        let inserted = insert_handler(
            State(state.clone()),
            Path("d/".to_string()),
            Json(insert_request("0")),
        )
        .await
        .unwrap();
        assert_eq!(inserted.path, "/d/");

        let exact = delete_handler(
            State(state.clone()),
            Path("d".to_string()),
            Query(DeleteQuery::default()),
        )
        .await
        .unwrap();
        assert!(!exact.removed);
        assert_eq!(state.cache.len(), 1);

        let swept = delete_handler(
            State(state.clone()),
            Path("d".to_string()),
            Query(DeleteQuery {
                directory_alias: true,
            }),
        )
        .await
        .unwrap();
        assert!(swept.removed);
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_inc_size_handler() {
        let state = state();
        let inserted = insert_handler(
            State(state.clone()),
            Path("f".to_string()),
            Json(insert_request("10")),
        )
        .await
        .unwrap();
        assert_eq!(inserted.path, "/f");

        let resized = inc_size_handler(
            State(state.clone()),
            Path("f".to_string()),
            Json(IncSizeRequest { delta: 5 }),
        )
        .await
        .unwrap();
        assert_eq!(resized.path, "/f");

        let attributes = state
            .cache
            .lookup("/f", &crate::cache::LookupOptions::attributes())
            .unwrap()
            .attributes
            .unwrap();
        assert_eq!(attributes.size, 15);
    }

    #[tokio::test]
    async fn test_no_object_handlers() {
        let state = state();

        let inserted = insert_no_object_handler(State(state.clone()), Path("ghost/".to_string()))
            .await
            .unwrap();
        assert!(inserted.cached);

        let exact = no_object_handler(
            State(state.clone()),
            Path("ghost".to_string()),
            Query(NoObjectQuery::default()),
        )
        .await
        .unwrap();
        assert!(!exact.cached);

        let checked = no_object_handler(
            State(state),
            Path("ghost".to_string()),
            Query(NoObjectQuery {
                directory_fallback: true,
            }),
        )
        .await
        .unwrap();
        assert!(checked.cached);
    }

    #[tokio::test]
    async fn test_update_config_handler() {
        let state = state();
        let req = ConfigUpdateRequest {
            max_entries: Some(10),
            clear_ttl: true,
            cache_no_object: Some(false),
            ..Default::default()
        };

        let response = update_config_handler(State(state.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(
            response.0,
            ConfigResponse {
                max_entries: 10,
                ttl_secs: None,
                cache_no_object: false,
            }
        );
        assert_eq!(config_handler(State(state)).await.0, response.0);
    }

    #[tokio::test]
    async fn test_update_config_invalid() {
        let req = ConfigUpdateRequest {
            ttl_secs: Some(5),
            clear_ttl: true,
            ..Default::default()
        };
        let result = update_config_handler(State(state()), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(state())).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
