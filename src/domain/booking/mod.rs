//! Booking aggregate
//!
//! Contains the Booking entity, its status state machine, and the
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{
    Booking, BookingStatus, Cancellation, CancelledBy, GuestDetails, PaymentStatus,
};
pub use repository::BookingRepository;
