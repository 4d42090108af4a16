// Application state (AppState)

use crate::booking::schedule::ClassSchedule;
use crate::booking::service::BookingService;
use crate::core::config::Config;
use crate::metrics::collector::BookingMetrics;
use crate::stores::ReservationStore;
use crate::utils::auth::AdminAuth;
use std::sync::Arc;

/// Shared application state
///
/// Everything request handlers need, wrapped in Arc for cheap cloning
/// across worker threads.
#[derive(Clone)]
pub struct AppState {
    /// Reservation rules over the injected store and class schedule
    pub bookings: Arc<BookingService>,

    /// Verifies admin codes and bearer tokens
    pub admin_auth: Arc<AdminAuth>,

    pub metrics: Arc<BookingMetrics>,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<dyn ReservationStore>, schedule: ClassSchedule) -> Self {
        let bookings = Arc::new(BookingService::new(
            store,
            Arc::new(schedule),
            config.booking.clone(),
        ));

        Self {
            bookings,
            admin_auth: Arc::new(AdminAuth::new(config.admin.tokens.clone())),
            metrics: Arc::new(BookingMetrics::new()),
        }
    }
}
