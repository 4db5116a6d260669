pub mod ports;
pub mod services;

// Re-export key types for convenience
pub use ports::{
    IntentMetadata, IntentStatus, Notifier, PaymentIntent, PaymentIntentStatus, PaymentProcessor,
    RefundOutcome,
};
pub use services::{
    AvailabilityService, BookingService, BookingServiceConfig, CreateBooking, CreatedBooking,
};
