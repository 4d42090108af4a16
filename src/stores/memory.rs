use crate::models::reservation::{NewReservation, Reservation};
use crate::stores::{ReservationStore, StorageError};
use chrono::NaiveDate;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory reservation store
pub struct InMemoryStore {
    reservations: DashMap<u64, Reservation>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            reservations: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Take the next id. Ids are never handed out twice, even if the
    /// reservation they were taken for is never stored.
    pub fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    pub fn next_id(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }

    /// Make sure future ids start at `at_least` or later
    pub fn advance_sequence(&self, at_least: u64) {
        self.next_id.fetch_max(at_least, Ordering::SeqCst);
    }

    /// Store a reservation under its own id, replacing any previous entry
    pub fn put(&self, reservation: Reservation) {
        self.advance_sequence(reservation.id.saturating_add(1));
        self.reservations.insert(reservation.id, reservation);
    }

    pub fn remove(&self, id: u64) -> Option<Reservation> {
        self.reservations.remove(&id).map(|(_, r)| r)
    }

    /// All reservations ordered by id
    pub fn snapshot(&self) -> Vec<Reservation> {
        let mut all: Vec<Reservation> = self
            .reservations
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|r| r.id);
        all
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReservationStore for InMemoryStore {
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, StorageError> {
        let mut list: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|entry| entry.value().date == date)
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by_key(|r| (r.room, r.start, r.id));
        Ok(list)
    }

    fn get(&self, id: u64) -> Result<Option<Reservation>, StorageError> {
        Ok(self.reservations.get(&id).map(|entry| entry.value().clone()))
    }

    fn insert(&self, reservation: NewReservation) -> Result<Reservation, StorageError> {
        let stored = reservation.with_id(self.allocate_id());
        self.put(stored.clone());
        Ok(stored)
    }

    fn delete_by_id(&self, id: u64) -> Result<Option<Reservation>, StorageError> {
        Ok(self.remove(id))
    }
}
