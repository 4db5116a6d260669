//! Booking endpoints: create, query, lifecycle transitions, payment confirmation

pub mod dto;
pub mod handlers;

pub use handlers::BookingAppState;
