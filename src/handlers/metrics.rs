// Metrics endpoint

use crate::core::error::MonitoringError;
use crate::core::state::AppState;
use crate::utils::auth::bearer_token;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;

/// Booking counters and uptime. Requires an admin bearer token.
///
/// GET /metrics
pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, MonitoringError> {
    let authorized = bearer_token(&headers).is_some_and(|token| state.admin_auth.verify(token));
    if !authorized {
        warn!("Unauthorized metrics access attempt");
        return Err(MonitoringError::InvalidApiKey);
    }

    Ok((StatusCode::OK, Json(state.metrics.get_snapshot())).into_response())
}
