pub mod booking;
pub mod core;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod stores;
pub mod utils;
pub mod validation;
pub mod wal;
