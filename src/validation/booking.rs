use crate::booking::conflict::BookingSlot;
use crate::booking::interval::{Interval, TimeOfDay};
use crate::core::config::BookingConfig;
use crate::core::error::BookingError;
use crate::models::api::{CreateReservationRequest, RoomInput};
use chrono::NaiveDate;

/// A create request that passed every field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBooking {
    pub slot: BookingSlot,
    pub student: String,
}

/// Parse a required `YYYY-MM-DD` value
pub fn parse_date(raw: Option<&str>) -> Result<NaiveDate, BookingError> {
    let raw = required("date", raw)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| BookingError::Validation(format!("date '{}' must be YYYY-MM-DD", raw)))
}

pub fn parse_time(field: &'static str, raw: &str) -> Result<TimeOfDay, BookingError> {
    raw.parse()
        .map_err(|e| BookingError::Validation(format!("{}: {}", field, e)))
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, BookingError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(BookingError::MissingField(field))
}

fn parse_room(raw: &RoomInput) -> Result<u32, BookingError> {
    let room = match raw {
        RoomInput::Number(n) => u32::try_from(*n).ok(),
        RoomInput::Text(s) => s.trim().parse::<u32>().ok(),
    };

    room.filter(|r| *r > 0)
        .ok_or_else(|| BookingError::Validation("room must be a positive integer".to_string()))
}

impl CreateReservationRequest {
    /// Check presence first, then formats, then the booking rules.
    pub fn validate(self, rules: &BookingConfig) -> Result<ValidatedBooking, BookingError> {
        let room = match &self.room {
            None => return Err(BookingError::MissingField("room")),
            Some(RoomInput::Text(s)) if s.trim().is_empty() => {
                return Err(BookingError::MissingField("room"))
            }
            Some(room) => room,
        };
        let date = required("date", self.date.as_deref())?;
        let start = required("start", self.start.as_deref())?;
        let end = required("end", self.end.as_deref())?;
        let student = required("student", self.student.as_deref())?;

        let room = parse_room(room)?;
        let date = parse_date(Some(date))?;
        let start = parse_time("start", start)?;
        let end = parse_time("end", end)?;

        let interval = Interval::new(start, end)
            .map_err(|_| BookingError::Validation("end time must be later than start time".to_string()))?;

        if !rules.rooms.contains(&room) {
            return Err(BookingError::Validation(format!("room {} does not exist", room)));
        }

        if let Ok(window) = rules.opening_window() {
            if !window.contains(&interval) {
                return Err(BookingError::Validation(format!(
                    "reservations must fall between {} and {}",
                    window.start(),
                    window.end()
                )));
            }
        }

        if student.chars().count() > rules.max_student_name_len {
            return Err(BookingError::Validation(format!(
                "student name must be at most {} characters",
                rules.max_student_name_len
            )));
        }

        Ok(ValidatedBooking {
            slot: BookingSlot {
                room,
                date,
                interval,
            },
            student: student.to_string(),
        })
    }
}
