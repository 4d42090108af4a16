use serde::{Deserialize, Serialize};

/// `room` as submitted by clients: browser forms send it as a string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RoomInput {
    Number(u64),
    Text(String),
}

/// POST /reservations body. Every field is optional here so that a missing
/// one can be reported by name instead of as a generic decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateReservationRequest {
    #[serde(default)]
    pub room: Option<RoomInput>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub student: Option<String>,
}

/// DELETE /reservations/:id body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelRequest {
    #[serde(default, rename = "manageCode", alias = "manage_code")]
    pub manage_code: Option<String>,
}

/// DELETE /admin/reservations/:id body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminCancelRequest {
    #[serde(default, rename = "adminCode", alias = "admin_code")]
    pub admin_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// GET /grid query; everything but `date` falls back to configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridQuery {
    pub date: Option<String>,
    pub granularity: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub room: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
