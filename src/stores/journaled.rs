use crate::models::reservation::{NewReservation, Reservation};
use crate::stores::memory::InMemoryStore;
use crate::stores::{ReservationStore, StorageError};
use crate::wal::wal::{Wal, WalOperation};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{error, info};

/// Reservation store backed by memory and an append-only journal.
///
/// Every change is journaled before it becomes visible; if the journal write
/// fails the in-memory state is left untouched.
pub struct JournaledStore {
    memory: InMemoryStore,
    wal: Wal,
}

impl JournaledStore {
    /// Open the journal at `path`, replay it and compact it
    pub fn open(path: PathBuf) -> Result<Self> {
        let wal = Wal::new(path).context("Failed to initialize reservation journal")?;
        let operations = wal.replay().context("Failed to replay reservation journal")?;

        let memory = InMemoryStore::new();
        apply_operations(&memory, &operations);

        info!(
            journal = %wal.path().display(),
            operations_replayed = operations.len(),
            reservations_loaded = memory.len(),
            next_id = memory.next_id(),
            "Reservation journal replayed"
        );

        let store = Self { memory, wal };
        store.compact().context("Failed to compact reservation journal")?;
        Ok(store)
    }

    /// Rewrite the journal as one SEQ line plus one ADD per live reservation
    pub fn compact(&self) -> Result<()> {
        let mut operations = vec![WalOperation::Sequence {
            next_id: self.memory.next_id(),
        }];
        operations.extend(
            self.memory
                .snapshot()
                .into_iter()
                .map(WalOperation::AddReservation),
        );
        self.wal.rewrite(&operations)
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    fn journal(&self, op: &WalOperation) -> Result<(), StorageError> {
        self.wal.log_operation(op).map_err(|e| {
            error!(error = %format!("{:#}", e), "Reservation journal write failed");
            StorageError::Journal(format!("{:#}", e))
        })
    }
}

fn apply_operations(memory: &InMemoryStore, operations: &[WalOperation]) {
    for op in operations {
        match op {
            WalOperation::AddReservation(reservation) => memory.put(reservation.clone()),
            WalOperation::RemoveReservation { id } => {
                memory.remove(*id);
                memory.advance_sequence(id.saturating_add(1));
            }
            WalOperation::Sequence { next_id } => memory.advance_sequence(*next_id),
        }
    }
}

impl ReservationStore for JournaledStore {
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, StorageError> {
        self.memory.list_by_date(date)
    }

    fn get(&self, id: u64) -> Result<Option<Reservation>, StorageError> {
        self.memory.get(id)
    }

    fn insert(&self, reservation: NewReservation) -> Result<Reservation, StorageError> {
        let stored = reservation.with_id(self.memory.allocate_id());
        self.journal(&WalOperation::AddReservation(stored.clone()))?;
        self.memory.put(stored.clone());
        Ok(stored)
    }

    fn delete_by_id(&self, id: u64) -> Result<Option<Reservation>, StorageError> {
        if self.memory.get(id)?.is_none() {
            return Ok(None);
        }
        self.journal(&WalOperation::RemoveReservation { id })?;
        Ok(self.memory.remove(id))
    }
}
