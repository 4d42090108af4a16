use crate::booking::availability::{compute_grid, Grid, GridSpec};
use crate::booking::conflict::find_conflict;
use crate::booking::schedule::{ClassSchedule, ExpandedBlock};
use crate::core::config::BookingConfig;
use crate::core::error::BookingError;
use crate::models::api::CreateReservationRequest;
use crate::models::reservation::{NewReservation, Reservation};
use crate::stores::ReservationStore;
use crate::utils::auth::{verify_secret, AdminAuth};
use chrono::NaiveDate;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

/// 4-digit manage code, uniform over 1000..9999. Not unique across
/// reservations.
pub fn generate_manage_code() -> String {
    rand::rng().random_range(1000..9999).to_string()
}

/// Booking operations over an injected store and the class timetable
pub struct BookingService {
    store: Arc<dyn ReservationStore>,
    schedule: Arc<ClassSchedule>,
    rules: BookingConfig,
}

impl BookingService {
    pub fn new(store: Arc<dyn ReservationStore>, schedule: Arc<ClassSchedule>, rules: BookingConfig) -> Self {
        Self {
            store,
            schedule,
            rules,
        }
    }

    pub fn rules(&self) -> &BookingConfig {
        &self.rules
    }

    pub fn list(&self, date: NaiveDate) -> Result<Vec<Reservation>, BookingError> {
        Ok(self.store.list_by_date(date)?)
    }

    pub fn blocks(&self, date: NaiveDate) -> Vec<ExpandedBlock> {
        self.schedule.blocks_on(date)
    }

    /// Validate, check class blocks, check reservations, then insert.
    ///
    /// The check and the insert are not atomic: two concurrent requests for
    /// the same slot can both succeed.
    pub fn create(&self, request: CreateReservationRequest) -> Result<Reservation, BookingError> {
        let booking = request.validate(&self.rules)?;
        let slot = booking.slot;

        let blocks = self.schedule.blocks_on(slot.date);
        let existing = self.store.list_by_date(slot.date)?;

        if let Some(conflict) = find_conflict(&slot, &blocks, &existing) {
            warn!(
                room = slot.room,
                date = %slot.date,
                interval = %slot.interval,
                conflict = %conflict,
                "Reservation rejected"
            );
            return Err(conflict.into());
        }

        let reservation = self.store.insert(NewReservation {
            room: slot.room,
            date: slot.date,
            interval: slot.interval,
            student: booking.student,
            manage_code: generate_manage_code(),
        })?;

        info!(
            reservation_id = reservation.id,
            room = reservation.room,
            date = %reservation.date,
            start = %reservation.start,
            end = %reservation.end,
            "Reservation created"
        );

        Ok(reservation)
    }

    /// Self-service cancellation with the code handed out at creation
    pub fn cancel(&self, id: u64, manage_code: Option<&str>) -> Result<Reservation, BookingError> {
        let code = manage_code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(BookingError::MissingField("manageCode"))?;

        let reservation = self.store.get(id)?.ok_or(BookingError::NotFound(id))?;

        if !verify_secret(code, &reservation.manage_code) {
            warn!(reservation_id = id, "Cancellation with wrong manage code");
            return Err(BookingError::InvalidManageCode);
        }

        let removed = self.store.delete_by_id(id)?.ok_or(BookingError::NotFound(id))?;
        info!(reservation_id = id, room = removed.room, date = %removed.date, "Reservation cancelled");
        Ok(removed)
    }

    /// Privileged cancellation. The credential is checked before the lookup
    /// so that callers without it cannot learn which ids exist.
    pub fn admin_cancel(
        &self,
        id: u64,
        credential: Option<&str>,
        auth: &AdminAuth,
    ) -> Result<Reservation, BookingError> {
        let credential = credential.ok_or(BookingError::MissingField("adminCode"))?;

        if !auth.verify(credential) {
            warn!(reservation_id = id, "Admin cancellation with invalid code");
            return Err(BookingError::InvalidAdminCode);
        }

        let removed = self.store.delete_by_id(id)?.ok_or(BookingError::NotFound(id))?;
        info!(
            reservation_id = id,
            room = removed.room,
            date = %removed.date,
            "Reservation cancelled by admin"
        );
        Ok(removed)
    }

    pub fn grid(&self, spec: &GridSpec) -> Result<Grid, BookingError> {
        let blocks = self.schedule.blocks_on(spec.date());
        let reservations = self.store.list_by_date(spec.date())?;
        Ok(compute_grid(spec, &blocks, &reservations))
    }
}
