//! Outbound ports — interfaces to the payment processor and the notifier
//!
//! These are the architectural contracts that decouple the booking service
//! from the concrete payment gateway and email delivery. Both are injected
//! at construction; there is no lazily-built process-wide client.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Booking, DomainResult};

// ── Payment processor ──────────────────────────────────────────

/// Processor-side state of a payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentIntentStatus {
    /// Created, awaiting a payment method
    RequiresPayment,
    /// Submitted, not yet settled
    Processing,
    /// Captured — the only state that finalizes a booking
    Succeeded,
    /// Cancelled before capture
    Canceled,
    /// Declined or errored
    Failed,
    Unknown(String),
}

impl PaymentIntentStatus {
    pub fn from_str(s: &str) -> Self {
        match s {
            "requires_payment" => Self::RequiresPayment,
            "processing" => Self::Processing,
            "succeeded" => Self::Succeeded,
            "canceled" => Self::Canceled,
            "failed" => Self::Failed,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl std::fmt::Display for PaymentIntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequiresPayment => write!(f, "requires_payment"),
            Self::Processing => write!(f, "processing"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Canceled => write!(f, "canceled"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// Booking context attached to an intent for processor-side reconciliation.
#[derive(Debug, Clone)]
pub struct IntentMetadata {
    pub booking_id: String,
    pub property_id: String,
    pub guest_id: String,
}

/// Freshly created payment intent.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub intent_id: String,
    /// Handed to the client to complete the charge
    pub client_secret: String,
}

/// Current intent state as reported by the processor.
#[derive(Debug, Clone)]
pub struct IntentStatus {
    pub status: PaymentIntentStatus,
    pub metadata: Option<IntentMetadata>,
}

/// Refund result from the processor.
#[derive(Debug, Clone)]
pub struct RefundOutcome {
    pub refund_id: String,
    pub amount: Decimal,
}

/// Payment gateway contract.
///
/// `get_intent_status` is an idempotent read and may be retried; the
/// mutating `create_intent` / `refund` calls must never be auto-retried
/// (double charge / double refund).
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_intent(
        &self,
        amount: Decimal,
        currency: &str,
        metadata: IntentMetadata,
    ) -> DomainResult<PaymentIntent>;

    async fn get_intent_status(&self, intent_id: &str) -> DomainResult<IntentStatus>;

    async fn refund(
        &self,
        intent_id: &str,
        amount: Option<Decimal>,
        reason: Option<&str>,
    ) -> DomainResult<RefundOutcome>;
}

// ── Notifier ───────────────────────────────────────────────────

/// Outbound email contract. Guest/host contact details are resolved behind
/// this boundary; the core hands over the booking only.
///
/// Every call is fire-and-forget from the service's point of view: failures
/// are logged by the dispatcher, never propagated to the booking mutation.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_guest_confirmation(&self, booking: &Booking) -> DomainResult<()>;

    async fn send_host_notification(&self, booking: &Booking) -> DomainResult<()>;

    async fn send_cancellation(&self, booking: &Booking, reason: Option<&str>) -> DomainResult<()>;
}
