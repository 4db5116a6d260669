//! Application services

mod availability;
mod booking;

pub use availability::{ranges_overlap, AvailabilityService};
pub use booking::{BookingService, BookingServiceConfig, CreateBooking, CreatedBooking};
