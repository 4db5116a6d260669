pub mod bookings;
pub mod health;
pub mod metrics;
pub mod properties;
pub mod request_id;
