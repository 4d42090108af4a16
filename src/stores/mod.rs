pub mod journaled;
pub mod memory;

use crate::models::reservation::{NewReservation, Reservation};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to write to journal: {0}")]
    Journal(String),
}

/// Storage capability the booking core runs against.
///
/// The conflict check and the insert are separate calls with no isolation
/// between them; two concurrent requests for the same slot can both pass the
/// check.
pub trait ReservationStore: Send + Sync {
    /// Reservations on `date`, ordered by (room, start, id)
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, StorageError>;

    fn get(&self, id: u64) -> Result<Option<Reservation>, StorageError>;

    /// Persist a reservation under the next id in the sequence
    fn insert(&self, reservation: NewReservation) -> Result<Reservation, StorageError>;

    /// Returns the removed reservation, or `None` if the id was unknown
    fn delete_by_id(&self, id: u64) -> Result<Option<Reservation>, StorageError>;
}
