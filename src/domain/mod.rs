pub mod booking;
pub mod error;
pub mod pricing;
pub mod property;

// Re-export commonly used types
pub use booking::{
    Booking, BookingRepository, BookingStatus, Cancellation, CancelledBy, GuestDetails,
    PaymentStatus,
};
pub use error::{DomainError, DomainResult};
pub use pricing::{nights_between, PricingQuote, PricingRates};
pub use property::{PropertyDirectory, PropertySnapshot};
