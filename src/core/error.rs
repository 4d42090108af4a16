// Centralized error handling for the booking service

use crate::booking::conflict::Conflict;
use crate::models::api::ErrorResponse;
use crate::stores::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Errors that can end a booking, listing or cancellation request
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Conflict(#[from] Conflict),

    #[error("Manage code does not match")]
    InvalidManageCode,

    #[error("Admin code is not valid")]
    InvalidAdminCode,

    #[error("Reservation not found")]
    NotFound(u64),

    #[error("Internal server error")]
    Storage(#[from] StorageError),
}

impl BookingError {
    pub fn status(&self) -> StatusCode {
        match self {
            BookingError::MissingField(_) => StatusCode::BAD_REQUEST,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Conflict(_) => StatusCode::BAD_REQUEST,
            BookingError::InvalidManageCode => StatusCode::FORBIDDEN,
            BookingError::InvalidAdminCode => StatusCode::FORBIDDEN,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        // Storage details were logged where they happened; the message here
        // stays generic.
        (
            self.status(),
            Json(ErrorResponse {
                success: false,
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Error, Debug)]
pub enum MonitoringError {
    #[error("Invalid API key")]
    InvalidApiKey,
}

impl IntoResponse for MonitoringError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            MonitoringError::InvalidApiKey => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::interval::TimeOfDay;

    #[test]
    fn test_status_mapping() {
        assert_eq!(BookingError::MissingField("room").status(), StatusCode::BAD_REQUEST);
        assert_eq!(BookingError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            BookingError::Conflict(Conflict::Reservation {
                id: 1,
                start: TimeOfDay::MIDNIGHT,
                end: TimeOfDay::END_OF_DAY,
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(BookingError::InvalidManageCode.status(), StatusCode::FORBIDDEN);
        assert_eq!(BookingError::InvalidAdminCode.status(), StatusCode::FORBIDDEN);
        assert_eq!(BookingError::NotFound(4).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            BookingError::Storage(StorageError::Journal("disk full".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_message_is_generic() {
        let err = BookingError::Storage(StorageError::Journal("/var/lib/secret.wal: EIO".into()));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_conflict_message_passes_through() {
        let err = BookingError::from(Conflict::ClassBlock {
            room: 2,
            start: "17:00".parse().unwrap(),
            end: "19:00".parse().unwrap(),
        });
        assert_eq!(err.to_string(), "Room 2 is reserved for a class from 17:00 to 19:00");
    }

    #[test]
    fn test_unauthorized_metrics() {
        let response = MonitoringError::InvalidApiKey.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
