//! Sandbox payment processor
//!
//! In-memory stand-in for the real gateway. Intents start in
//! `requires_payment` and are moved along by the test (or by an operator
//! endpoint in local runs) via the `mark_*` helpers. Refunds follow the
//! same rules the gateway enforces: only a succeeded intent can be
//! refunded, and never for more than was charged.

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;

use crate::application::ports::{
    IntentMetadata, IntentStatus, PaymentIntent, PaymentIntentStatus, PaymentProcessor,
    RefundOutcome,
};
use crate::domain::{DomainError, DomainResult};

struct SandboxIntent {
    amount: Decimal,
    #[allow(dead_code)]
    currency: String,
    metadata: IntentMetadata,
    status: PaymentIntentStatus,
    refunded: Decimal,
}

/// In-memory payment processor for development and testing
#[derive(Default)]
pub struct SandboxPaymentProcessor {
    intents: DashMap<String, SandboxIntent>,
}

impl SandboxPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_status(&self, intent_id: &str, status: PaymentIntentStatus) {
        if let Some(mut intent) = self.intents.get_mut(intent_id) {
            intent.status = status;
        }
    }

    /// Simulate the client completing the charge.
    pub fn mark_succeeded(&self, intent_id: &str) {
        self.set_status(intent_id, PaymentIntentStatus::Succeeded);
    }

    /// Simulate a charge stuck in settlement.
    pub fn mark_processing(&self, intent_id: &str) {
        self.set_status(intent_id, PaymentIntentStatus::Processing);
    }

    /// Simulate a declined charge.
    pub fn mark_failed(&self, intent_id: &str) {
        self.set_status(intent_id, PaymentIntentStatus::Failed);
    }
}

#[async_trait]
impl PaymentProcessor for SandboxPaymentProcessor {
    async fn create_intent(
        &self,
        amount: Decimal,
        currency: &str,
        metadata: IntentMetadata,
    ) -> DomainResult<PaymentIntent> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::Payment(format!(
                "Intent amount must be positive, got {}",
                amount
            )));
        }

        let intent_id = format!("pi_{}", uuid::Uuid::new_v4().simple());
        let client_secret = format!("{}_secret_{}", intent_id, uuid::Uuid::new_v4().simple());
        debug!(intent_id = %intent_id, amount = %amount, currency, "Sandbox intent created");

        self.intents.insert(
            intent_id.clone(),
            SandboxIntent {
                amount,
                currency: currency.to_string(),
                metadata,
                status: PaymentIntentStatus::RequiresPayment,
                refunded: Decimal::ZERO,
            },
        );

        Ok(PaymentIntent {
            intent_id,
            client_secret,
        })
    }

    async fn get_intent_status(&self, intent_id: &str) -> DomainResult<IntentStatus> {
        let intent = self.intents.get(intent_id).ok_or_else(|| DomainError::NotFound {
            entity: "PaymentIntent",
            field: "id",
            value: intent_id.to_string(),
        })?;

        Ok(IntentStatus {
            status: intent.status.clone(),
            metadata: Some(intent.metadata.clone()),
        })
    }

    async fn refund(
        &self,
        intent_id: &str,
        amount: Option<Decimal>,
        reason: Option<&str>,
    ) -> DomainResult<RefundOutcome> {
        let mut intent = self.intents.get_mut(intent_id).ok_or_else(|| {
            DomainError::NotFound {
                entity: "PaymentIntent",
                field: "id",
                value: intent_id.to_string(),
            }
        })?;

        if intent.status != PaymentIntentStatus::Succeeded {
            return Err(DomainError::Payment(format!(
                "Intent {} has status '{}', only succeeded intents can be refunded",
                intent_id, intent.status
            )));
        }

        let amount = amount.unwrap_or(intent.amount);
        if amount <= Decimal::ZERO || amount > intent.amount - intent.refunded {
            return Err(DomainError::Payment(format!(
                "Refund amount {} exceeds the refundable balance of intent {}",
                amount, intent_id
            )));
        }

        intent.refunded += amount;
        debug!(
            intent_id = %intent_id,
            amount = %amount,
            reason = reason.unwrap_or("-"),
            "Sandbox refund issued"
        );

        Ok(RefundOutcome {
            refund_id: format!("re_{}", uuid::Uuid::new_v4().simple()),
            amount,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn metadata() -> IntentMetadata {
        IntentMetadata {
            booking_id: "b-1".into(),
            property_id: "p-1".into(),
            guest_id: "g-1".into(),
        }
    }

    #[tokio::test]
    async fn intent_lifecycle() {
        let sandbox = SandboxPaymentProcessor::new();
        let intent = sandbox
            .create_intent(dec!(100), "USD", metadata())
            .await
            .unwrap();
        assert!(intent.client_secret.starts_with(&intent.intent_id));

        let status = sandbox.get_intent_status(&intent.intent_id).await.unwrap();
        assert_eq!(status.status, PaymentIntentStatus::RequiresPayment);
        assert_eq!(status.metadata.unwrap().booking_id, "b-1");

        sandbox.mark_succeeded(&intent.intent_id);
        let status = sandbox.get_intent_status(&intent.intent_id).await.unwrap();
        assert!(status.status.is_succeeded());
    }

    #[tokio::test]
    async fn refund_rules() {
        let sandbox = SandboxPaymentProcessor::new();
        let intent = sandbox
            .create_intent(dec!(100), "USD", metadata())
            .await
            .unwrap();

        // Not captured yet: refund refused.
        assert!(sandbox.refund(&intent.intent_id, None, None).await.is_err());

        sandbox.mark_succeeded(&intent.intent_id);
        let outcome = sandbox
            .refund(&intent.intent_id, Some(dec!(60)), Some("partial"))
            .await
            .unwrap();
        assert_eq!(outcome.amount, dec!(60));

        // Remaining balance is 40; over-refund refused, exact ok.
        assert!(sandbox
            .refund(&intent.intent_id, Some(dec!(50)), None)
            .await
            .is_err());
        let rest = sandbox
            .refund(&intent.intent_id, Some(dec!(40)), None)
            .await
            .unwrap();
        assert_eq!(rest.amount, dec!(40));
    }

    #[tokio::test]
    async fn unknown_intent_is_not_found() {
        let sandbox = SandboxPaymentProcessor::new();
        assert!(matches!(
            sandbox.get_intent_status("pi_missing").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn zero_amount_intent_is_rejected() {
        let sandbox = SandboxPaymentProcessor::new();
        assert!(sandbox
            .create_intent(dec!(0), "USD", metadata())
            .await
            .is_err());
    }
}
