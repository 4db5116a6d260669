//! Payment processor implementations

mod sandbox;

pub use sandbox::SandboxPaymentProcessor;
