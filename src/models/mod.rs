pub mod api;
pub mod reservation;
