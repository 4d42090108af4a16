use crate::booking::schedule::ExpandedBlock;
use crate::core::error::BookingError;
use crate::core::state::AppState;
use crate::models::api::DateQuery;
use crate::validation::booking::parse_date;
use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;

/// Class blocks falling on the weekday of `date`
///
/// GET /blocks?date=YYYY-MM-DD
pub async fn blocks_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateQuery>,
) -> Result<Json<Vec<ExpandedBlock>>, BookingError> {
    let date = parse_date(params.date.as_deref())?;
    Ok(Json(state.bookings.blocks(date)))
}
