// Turn axum extractor rejections into booking errors so every failure
// carries the same JSON body.

use crate::core::error::BookingError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path};

pub fn reservation_id(path: Result<Path<u64>, PathRejection>) -> Result<u64, BookingError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(_) => Err(BookingError::Validation(
            "reservation id must be a positive integer".to_string(),
        )),
    }
}

/// Required JSON body; anything axum could not decode is a 400
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, BookingError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(BookingError::Validation(format!(
            "malformed JSON body: {}",
            rejection.body_text()
        ))),
    }
}

/// Body that may be left out entirely. A request with no JSON content type
/// decodes as the default value; other failures are still a 400.
pub fn optional_json_body<T: Default>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, BookingError> {
    match payload {
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        other => json_body(other),
    }
}
