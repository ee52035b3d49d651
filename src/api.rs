//! HTTP API for HUC lookups.
//!
//! Endpoints:
//! - GET /api/huc?lat=..&lng=..&level=.. - Resolve a point to its hydrologic unit
//! - GET /health - Service health check

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::LookupError;
use crate::models::HucResult;
use crate::service::HucLookupService;

/// Application state shared across handlers
pub struct AppState {
    pub service: HucLookupService,
}

impl AppState {
    pub fn new(service: HucLookupService) -> Self {
        Self { service }
    }
}

/// Build the router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/huc", get(huc_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
struct HucQueryParams {
    /// Latitude, WGS84 degrees
    lat: Option<String>,
    /// Longitude, WGS84 degrees
    lng: Option<String>,
    /// HUC level ("8", "10", "12"); defaults to "12"
    level: Option<String>,
}

/// Point to HUC lookup
async fn huc_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<HucQueryParams>, QueryRejection>,
) -> Result<Json<HucResult>, LookupError> {
    let Query(params) = params.map_err(|_| LookupError::InvalidInput)?;

    let result = state
        .service
        .lookup(
            params.lat.as_deref(),
            params.lng.as_deref(),
            params.level.as_deref(),
        )
        .await?;

    Ok(Json(result))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    cached_entries: usize,
}

/// Health check endpoint; reports live cache entries only
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let cache = state.service.cache();
    let purged = cache.purge_expired();
    if purged > 0 {
        debug!("Purged {} expired cache entries", purged);
    }

    Json(HealthResponse {
        status: "ok",
        cached_entries: cache.len(),
    })
}

impl LookupError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LookupError::InvalidInput => StatusCode::BAD_REQUEST,
            LookupError::NotFound => StatusCode::NOT_FOUND,
            LookupError::LookupFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        // Failure detail is logged by the service and never sent to callers
        (
            self.status_code(),
            Json(json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(LookupError::InvalidInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(LookupError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            LookupError::LookupFailed("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
