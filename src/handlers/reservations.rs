use crate::core::error::BookingError;
use crate::core::state::AppState;
use crate::handlers::extract::{json_body, optional_json_body, reservation_id};
use crate::models::api::{CancelRequest, CreateReservationRequest, DateQuery, SuccessResponse};
use crate::models::reservation::{Reservation, ReservationSummary};
use crate::validation::booking::parse_date;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    response::Json,
};
use std::sync::Arc;

/// Reservations on one date, without manage codes
///
/// GET /reservations?date=YYYY-MM-DD
pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateQuery>,
) -> Result<Json<Vec<ReservationSummary>>, BookingError> {
    let date = parse_date(params.date.as_deref())?;
    let reservations = state.bookings.list(date)?;

    Ok(Json(reservations.iter().map(ReservationSummary::from).collect()))
}

/// Create a reservation. The response is the only place the caller learns
/// the manage code.
///
/// POST /reservations
pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Result<Json<Reservation>, BookingError> {
    let request = json_body(payload).inspect_err(|e| state.metrics.record_failure(e))?;

    let reservation = state
        .bookings
        .create(request)
        .inspect_err(|e| state.metrics.record_failure(e))?;

    state.metrics.increment_created();
    Ok(Json(reservation))
}

/// Cancel with the manage code issued at creation
///
/// DELETE /reservations/{id}  body: {"manageCode": "1234"}
pub async fn cancel_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<CancelRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, BookingError> {
    let id = reservation_id(path).inspect_err(|e| state.metrics.record_failure(e))?;
    let body = optional_json_body(payload).inspect_err(|e| state.metrics.record_failure(e))?;

    state
        .bookings
        .cancel(id, body.manage_code.as_deref())
        .inspect_err(|e| state.metrics.record_failure(e))?;

    state.metrics.increment_cancelled();
    Ok(Json(SuccessResponse {
        success: true,
        message: "Reservation cancelled".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{body_json, create_test_state, create_test_state_with_store};
    use crate::stores::test_support::FailingWriteStore;
    use crate::models::api::RoomInput;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn request(room: u64, start: &str, end: &str) -> CreateReservationRequest {
        CreateReservationRequest {
            room: Some(RoomInput::Number(room)),
            date: Some("2025-01-01".to_string()),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            student: Some("Mina".to_string()),
        }
    }

    fn date_query(date: Option<&str>) -> Query<DateQuery> {
        Query(DateQuery {
            date: date.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let state = create_test_state("");

        let Json(created) = create_handler(State(state.clone()), Ok(Json(request(1, "13:00", "14:00"))))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.manage_code.len(), 4);

        let response = list_handler(State(state.clone()), date_query(Some("2025-01-01")))
            .await
            .unwrap()
            .into_response();
        let listed: Vec<serde_json::Value> = body_json(response).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["start"], "13:00");
        assert!(listed[0].get("manage_code").is_none());

        assert_eq!(state.metrics.get_snapshot().reservations_created, 1);
    }

    #[tokio::test]
    async fn test_list_requires_date() {
        let state = create_test_state("");
        let err = list_handler(State(state), date_query(None)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_overlap_rejected_with_400() {
        let state = create_test_state("");
        create_handler(State(state.clone()), Ok(Json(request(1, "13:00", "14:00"))))
            .await
            .unwrap();

        let err = create_handler(State(state.clone()), Ok(Json(request(1, "13:30", "14:30"))))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Conflict(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.metrics.get_snapshot().conflicts_rejected, 1);
    }

    #[tokio::test]
    async fn test_class_block_rejected() {
        let state = create_test_state("3,2,17:00,19:00");
        let err = create_handler(State(state), Ok(Json(request(2, "18:00", "19:00"))))
            .await
            .unwrap_err();
        let body: serde_json::Value = body_json(err.into_response()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Room 2 is reserved for a class from 17:00 to 19:00");
    }

    #[tokio::test]
    async fn test_cancel_flow() {
        let state = create_test_state("");
        let Json(created) = create_handler(State(state.clone()), Ok(Json(request(1, "13:00", "14:00"))))
            .await
            .unwrap();

        let wrong = if created.manage_code == "1000" { "1001" } else { "1000" };
        let err = cancel_handler(
            State(state.clone()),
            Ok(Path(created.id)),
            Ok(Json(CancelRequest {
                manage_code: Some(wrong.to_string()),
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);

        let date = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(state.bookings.list(date).unwrap().len(), 1);

        let Json(ok) = cancel_handler(
            State(state.clone()),
            Ok(Path(created.id)),
            Ok(Json(CancelRequest {
                manage_code: Some(created.manage_code.clone()),
            })),
        )
        .await
        .unwrap();
        assert!(ok.success);
        assert!(state.bookings.list(date).unwrap().is_empty());

        let err = cancel_handler(
            State(state.clone()),
            Ok(Path(created.id)),
            Ok(Json(CancelRequest {
                manage_code: Some(created.manage_code),
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let snapshot = state.metrics.get_snapshot();
        assert_eq!(snapshot.cancellations, 1);
        assert_eq!(snapshot.auth_failures, 1);
    }

    #[tokio::test]
    async fn test_storage_failure_is_generic_500() {
        let state = create_test_state_with_store(Arc::new(FailingWriteStore::default()), "");

        let err = create_handler(State(state.clone()), Ok(Json(request(1, "13:00", "14:00"))))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Internal server error");

        let date = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(state.bookings.list(date).unwrap().is_empty());
        assert_eq!(state.metrics.get_snapshot().reservations_created, 0);
    }

    #[tokio::test]
    async fn test_cancel_without_code_is_400() {
        let state = create_test_state("");
        let err = cancel_handler(State(state.clone()), Ok(Path(1)), Ok(Json(CancelRequest::default())))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.metrics.get_snapshot().validation_failures, 1);
    }
}
