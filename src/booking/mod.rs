pub mod availability;
pub mod conflict;
pub mod interval;
pub mod schedule;
pub mod service;
