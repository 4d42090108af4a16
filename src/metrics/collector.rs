use crate::core::error::BookingError;
use crate::utils::time::current_timestamp;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct BookingMetrics {
    pub reservations_created: AtomicU64,
    pub conflicts_rejected: AtomicU64,
    pub validation_failures: AtomicU64,
    pub cancellations: AtomicU64,
    pub admin_cancellations: AtomicU64,
    pub auth_failures: AtomicU64,
    pub start_time: i64,
}

#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub reservations_created: u64,
    pub conflicts_rejected: u64,
    pub validation_failures: u64,
    pub cancellations: u64,
    pub admin_cancellations: u64,
    pub auth_failures: u64,
    pub uptime_seconds: i64,
}

impl BookingMetrics {
    pub fn new() -> Self {
        Self {
            reservations_created: AtomicU64::new(0),
            conflicts_rejected: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            cancellations: AtomicU64::new(0),
            admin_cancellations: AtomicU64::new(0),
            auth_failures: AtomicU64::new(0),
            start_time: current_timestamp(),
        }
    }

    pub fn increment_created(&self) {
        self.reservations_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cancelled(&self) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_admin_cancelled(&self) {
        self.admin_cancellations.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a failed request under the bucket its error belongs to.
    /// Not-found and storage failures are not counted.
    pub fn record_failure(&self, error: &BookingError) {
        let counter = match error {
            BookingError::MissingField(_) | BookingError::Validation(_) => &self.validation_failures,
            BookingError::Conflict(_) => &self.conflicts_rejected,
            BookingError::InvalidManageCode | BookingError::InvalidAdminCode => &self.auth_failures,
            BookingError::NotFound(_) | BookingError::Storage(_) => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reservations_created: self.reservations_created.load(Ordering::Relaxed),
            conflicts_rejected: self.conflicts_rejected.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
            admin_cancellations: self.admin_cancellations.load(Ordering::Relaxed),
            auth_failures: self.auth_failures.load(Ordering::Relaxed),
            uptime_seconds: current_timestamp() - self.start_time,
        }
    }
}

impl Default for BookingMetrics {
    fn default() -> Self {
        Self::new()
    }
}
