//! # StayHaven Booking Service
//!
//! Booking subsystem for a vacation rental marketplace: pricing,
//! calendar availability, the booking lifecycle and payment flow.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Booking entity, pricing rules, status state machines
//! - **application**: Booking orchestration and outbound ports
//! - **infrastructure**: External concerns (database, payment processors)
//! - **notifications**: Fire-and-forget guest/host notifications
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod notifications;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmBookingRepository};

// Re-export API router
pub use interfaces::http::create_api_router;
