use crate::booking::interval::{Interval, TimeOfDay};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored room reservation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Monotonically assigned by the store
    pub id: u64,
    pub room: u32,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    /// Free-text name of whoever booked the room
    pub student: String,
    /// 4-digit secret handed out at creation, required for self-service cancel
    pub manage_code: String,
}

impl Reservation {
    /// Stored reservations always have `end > start`; a hand-edited journal
    /// that breaks this yields `None` and is treated as occupying nothing.
    pub fn interval(&self) -> Option<Interval> {
        Interval::new(self.start, self.end).ok()
    }
}

/// A validated reservation that has not been assigned an id yet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewReservation {
    pub room: u32,
    pub date: NaiveDate,
    pub interval: Interval,
    pub student: String,
    pub manage_code: String,
}

impl NewReservation {
    pub fn with_id(self, id: u64) -> Reservation {
        Reservation {
            id,
            room: self.room,
            date: self.date,
            start: self.interval.start(),
            end: self.interval.end(),
            student: self.student,
            manage_code: self.manage_code,
        }
    }
}

/// Public listing shape; never exposes the manage code
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationSummary {
    pub id: u64,
    pub room: u32,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub student: String,
}

impl From<&Reservation> for ReservationSummary {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id,
            room: r.room,
            date: r.date,
            start: r.start,
            end: r.end,
            student: r.student.clone(),
        }
    }
}
