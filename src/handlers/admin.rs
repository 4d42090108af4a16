use crate::core::error::BookingError;
use crate::core::state::AppState;
use crate::handlers::extract::{optional_json_body, reservation_id};
use crate::models::api::{AdminCancelRequest, DateQuery, SuccessResponse};
use crate::models::reservation::Reservation;
use crate::utils::auth::AdminAuth;
use crate::validation::booking::parse_date;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::HeaderMap,
    response::Json,
};
use std::sync::Arc;

/// Full listing for staff, manage codes included. Unauthenticated.
///
/// GET /admin/reservations?date=YYYY-MM-DD
pub async fn admin_list_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateQuery>,
) -> Result<Json<Vec<Reservation>>, BookingError> {
    let date = parse_date(params.date.as_deref())?;
    Ok(Json(state.bookings.list(date)?))
}

/// Cancel any reservation with an admin code, given in the body as
/// `adminCode` or as a bearer token
///
/// DELETE /admin/reservations/{id}
pub async fn admin_cancel_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<AdminCancelRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, BookingError> {
    let id = reservation_id(path).inspect_err(|e| state.metrics.record_failure(e))?;
    let body = optional_json_body(payload).inspect_err(|e| state.metrics.record_failure(e))?;
    let credential = AdminAuth::credential(body.admin_code.as_deref(), &headers);

    state
        .bookings
        .admin_cancel(id, credential, &state.admin_auth)
        .inspect_err(|e| state.metrics.record_failure(e))?;

    state.metrics.increment_admin_cancelled();
    Ok(Json(SuccessResponse {
        success: true,
        message: "Reservation cancelled by admin".to_string(),
    }))
}
