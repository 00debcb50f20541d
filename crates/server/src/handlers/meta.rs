//! Source introspection and liveness endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Settings response.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    /// Digits the backing file can serve.
    pub available_digits: i64,
    /// Largest chunk a single request may ask for.
    pub max_chunk_size: u64,
}

/// GET /api/v1/settings
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<SettingsResponse>> {
    let source = state.source.clone();
    let available_digits = tokio::task::spawn_blocking(move || source.available_digits())
        .await
        .map_err(|e| ApiError::Internal(format!("spawn_blocking failed: {e}")))??;

    Ok(Json(SettingsResponse {
        available_digits,
        max_chunk_size: state.source.max_chunk_size() as u64,
    }))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/v1/health - Health check.
///
/// This endpoint is intentionally unauthenticated to support:
/// - Kubernetes liveness/readiness probes
/// - Load balancer health checks
///
/// Returns only non-sensitive information (status and version).
pub async fn health_check() -> ApiResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
