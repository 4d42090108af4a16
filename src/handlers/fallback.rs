use crate::models::api::ErrorResponse;
use axum::{
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};

pub async fn fallback_handler(headers: HeaderMap) -> Response {
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let is_browser = ["Mozilla", "Chrome", "Safari", "Firefox", "Edge"]
        .iter()
        .any(|marker| user_agent.contains(marker));

    if is_browser {
        return (StatusCode::NOT_FOUND, Html("404 Not Found")).into_response();
    }

    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            error: "Invalid endpoint. Valid endpoints: /reservations, /admin/reservations, /blocks, /grid, /health, /metrics"
                .to_string(),
        }),
    )
        .into_response()
}
