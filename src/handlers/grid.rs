use crate::booking::availability::Grid;
use crate::core::error::BookingError;
use crate::core::state::AppState;
use crate::models::api::GridQuery;
use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;

/// Availability grid: one row per time bucket, one cell per room
///
/// GET /grid?date=YYYY-MM-DD[&granularity=M][&from=HH:MM][&to=HH:MM][&room=R]
pub async fn grid_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GridQuery>,
) -> Result<Json<Grid>, BookingError> {
    let spec = params.to_spec(state.bookings.rules())?;
    Ok(Json(state.bookings.grid(&spec)?))
}
