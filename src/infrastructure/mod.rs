//! External concerns: database, in-memory storage, payment processors

pub mod database;
pub mod payments;
pub mod storage;

pub use database::{init_database, DatabaseConfig, SeaOrmBookingRepository};
pub use payments::SandboxPaymentProcessor;
pub use storage::{InMemoryBookingRepository, InMemoryPropertyDirectory};
