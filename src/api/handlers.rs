//! Operational handlers: health, gate statistics and tag purge.

use axum::{extract::State, http::HeaderMap, response::IntoResponse, response::Response, Json};
use bytes::Bytes;
use tracing::info;

use crate::api::AppState;
use crate::error::{ApiError, Result};
use crate::models::{HealthResponse, PurgeRequest, PurgeResponse, StatsResponse};

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
///
/// Returns the process-local gate counters.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.gate.stats()))
}

/// Handler for POST /admin/purge
///
/// Removes every stored entry carrying one of the requested tags. Unlike the
/// read path, a store failure here is reported to the operator.
pub async fn purge_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    if let Err(rejection) = state.access.authorize(&headers) {
        return Ok(rejection);
    }

    let req: PurgeRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("Invalid purge body: {}", e)))?;
    let tags = req.validate()?;

    let purged = state.gate.store().invalidate_tags(&tags).await?;
    info!(tags = ?tags, purged, "cache purge");

    Ok(Json(PurgeResponse { purged, tags }).into_response())
}
