pub mod booking;
pub mod grid;
