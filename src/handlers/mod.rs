pub mod admin;
pub mod blocks;
pub mod extract;
pub mod fallback;
pub mod grid;
pub mod health;
pub mod metrics;
pub mod reservations;
