//! Application ports

pub mod outbound;

pub use outbound::{
    IntentMetadata, IntentStatus, Notifier, PaymentIntent, PaymentIntentStatus, PaymentProcessor,
    RefundOutcome,
};
