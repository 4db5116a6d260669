//! Booking service
//!
//! Orchestrates property lookup, availability, pricing, persistence, the
//! payment processor and outbound notifications for the booking lifecycle:
//! create, confirm, payment finalization, cancel, refund, complete.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use metrics::counter;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::info;

use crate::application::ports::{IntentMetadata, PaymentProcessor};
use crate::application::services::availability::AvailabilityService;
use crate::domain::{
    Booking, BookingRepository, BookingStatus, CancelledBy, DomainError, DomainResult,
    GuestDetails, PaymentStatus, PricingQuote, PricingRates, PropertyDirectory,
};
use crate::notifications::NotificationDispatcher;
use crate::shared::retry::{retry_with_backoff, RetryConfig};

/// Tuning knobs for the booking service.
#[derive(Debug, Clone)]
pub struct BookingServiceConfig {
    pub rates: PricingRates,
    /// Upper bound on any single payment-processor call.
    pub payment_timeout: Duration,
}

impl Default for BookingServiceConfig {
    fn default() -> Self {
        Self {
            rates: PricingRates::default(),
            payment_timeout: Duration::from_secs(10),
        }
    }
}

/// Booking creation request.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub property_id: String,
    pub guest_id: String,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub number_of_guests: u32,
    pub guests: GuestDetails,
    pub special_requests: Option<String>,
}

/// Result of a successful creation: the persisted booking, its cost
/// breakdown, and the client secret to complete the charge.
#[derive(Debug, Clone)]
pub struct CreatedBooking {
    pub booking: Booking,
    pub quote: PricingQuote,
    pub client_secret: String,
}

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    properties: Arc<dyn PropertyDirectory>,
    payments: Arc<dyn PaymentProcessor>,
    notifications: NotificationDispatcher,
    availability: AvailabilityService,
    rates: PricingRates,
    payment_timeout: Duration,
    /// Serializes the check-then-insert sequence per property; without it
    /// two concurrent creates can both pass the availability check.
    property_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        properties: Arc<dyn PropertyDirectory>,
        payments: Arc<dyn PaymentProcessor>,
        notifications: NotificationDispatcher,
        config: BookingServiceConfig,
    ) -> Self {
        let availability = AvailabilityService::new(Arc::clone(&bookings));
        Self {
            bookings,
            properties,
            payments,
            notifications,
            availability,
            rates: config.rates,
            payment_timeout: config.payment_timeout,
            property_locks: DashMap::new(),
        }
    }

    pub fn availability(&self) -> &AvailabilityService {
        &self.availability
    }

    fn property_lock(&self, property_id: &str) -> Arc<Mutex<()>> {
        self.property_locks
            .entry(property_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn with_payment_timeout<T>(
        &self,
        operation: &'static str,
        fut: impl std::future::Future<Output = DomainResult<T>>,
    ) -> DomainResult<T> {
        tokio::time::timeout(self.payment_timeout, fut)
            .await
            .map_err(|_| {
                DomainError::Internal(format!("Payment processor timed out during {operation}"))
            })?
    }

    // ── Creation ───────────────────────────────────────────────

    /// Create a booking: validate, hold the property's calendar lock,
    /// check availability, price, open a payment intent, persist.
    ///
    /// Confirmation emails go out here only when the booking is already
    /// both confirmed and paid at creation; otherwise notification waits
    /// for [`confirm_payment`](Self::confirm_payment).
    pub async fn create(&self, request: CreateBooking) -> DomainResult<CreatedBooking> {
        let property = self
            .properties
            .get_property(&request.property_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Property",
                field: "id",
                value: request.property_id.clone(),
            })?;

        if !property.is_active {
            return Err(DomainError::Validation(format!(
                "Property {} is not active",
                property.id
            )));
        }

        if request.guests.adults < 1 {
            return Err(DomainError::Validation(
                "At least one adult is required".to_string(),
            ));
        }

        if request.guests.total() != request.number_of_guests {
            return Err(DomainError::Validation(format!(
                "Guest breakdown sums to {}, not {}",
                request.guests.total(),
                request.number_of_guests
            )));
        }

        if request.number_of_guests > property.max_guests {
            return Err(DomainError::Validation(format!(
                "{} guests exceed the property capacity of {}",
                request.number_of_guests, property.max_guests
            )));
        }

        if request.check_out <= request.check_in {
            return Err(DomainError::Validation(
                "check_out must be after check_in".to_string(),
            ));
        }

        // Critical section: availability check and insert must not
        // interleave with another create for the same property.
        let lock = self.property_lock(&property.id);
        let _guard = lock.lock().await;

        let available = self
            .availability
            .is_available(&property.id, request.check_in, request.check_out, None)
            .await?;
        if !available {
            return Err(DomainError::Conflict(format!(
                "Property {} is not available for the requested dates",
                property.id
            )));
        }

        let mut booking = Booking::new(
            &property,
            request.guest_id,
            request.check_in,
            request.check_out,
            request.guests,
            request.special_requests,
            &self.rates,
        );
        let quote = PricingQuote {
            subtotal: booking.subtotal,
            cleaning_fee: booking.cleaning_fee,
            service_fee: booking.service_fee,
            tax: booking.tax_amount,
            total: booking.total_amount,
        };

        let metadata = IntentMetadata {
            booking_id: booking.id.clone(),
            property_id: booking.property_id.clone(),
            guest_id: booking.guest_id.clone(),
        };
        let intent = self
            .with_payment_timeout(
                "create_intent",
                self.payments
                    .create_intent(booking.total_amount, &booking.currency, metadata),
            )
            .await?;
        booking.payment_intent_id = Some(intent.intent_id);

        self.bookings.save(booking.clone()).await?;
        counter!("bookings_created_total").increment(1);

        info!(
            booking_id = %booking.id,
            property_id = %booking.property_id,
            status = %booking.status,
            nights = booking.number_of_nights,
            total = %booking.total_amount,
            "Booking created"
        );

        if booking.status == BookingStatus::Confirmed
            && booking.payment_status == PaymentStatus::Paid
        {
            self.notifications.booking_confirmed(&booking);
        }

        Ok(CreatedBooking {
            booking,
            quote,
            client_secret: intent.client_secret,
        })
    }

    // ── Payment finalization ───────────────────────────────────

    /// Finalize the booking behind a payment intent once the processor
    /// reports the charge as succeeded.
    ///
    /// The intent-status read is idempotent and gets one retry on
    /// transient failure; pricing is re-derived from the current property
    /// price before persisting.
    pub async fn confirm_payment(&self, payment_intent_id: &str) -> DomainResult<Booking> {
        let status = retry_with_backoff(
            RetryConfig::default(),
            || {
                self.with_payment_timeout(
                    "get_intent_status",
                    self.payments.get_intent_status(payment_intent_id),
                )
            },
            DomainError::is_transient,
            "get_intent_status",
        )
        .await?;

        if !status.status.is_succeeded() {
            return Err(DomainError::Payment(format!(
                "Payment intent {} has status '{}', expected 'succeeded'",
                payment_intent_id, status.status
            )));
        }

        let mut booking = self
            .bookings
            .find_by_intent(payment_intent_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                field: "payment_intent_id",
                value: payment_intent_id.to_string(),
            })?;

        // Webhook replay: already finalized, nothing to do.
        if booking.payment_status == PaymentStatus::Paid {
            return Ok(booking);
        }

        // The booking may have been cancelled or marked no-show while the
        // charge was in flight. Refuse to capture against a stay that no
        // longer holds the calendar; the refund flow handles the money.
        if !booking.status.holds_calendar() {
            return Err(DomainError::Conflict(format!(
                "Booking {} is {} and can no longer accept payment",
                booking.id, booking.status
            )));
        }

        if let Some(property) = self.properties.get_property(&booking.property_id).await? {
            booking.price_per_night = property.price_per_night;
            booking.cleaning_fee = property.cleaning_fee;
        }
        booking.reprice(&self.rates);
        booking.mark_paid()?;
        if booking.status == BookingStatus::Pending {
            booking.confirm()?;
        }

        self.bookings.update(booking.clone()).await?;
        counter!("payments_confirmed_total").increment(1);

        info!(
            booking_id = %booking.id,
            intent_id = payment_intent_id,
            total = %booking.total_amount,
            "Payment confirmed, booking finalized"
        );

        self.notifications.booking_confirmed(&booking);
        Ok(booking)
    }

    // ── Lifecycle transitions ──────────────────────────────────

    /// Host approval of a pending booking.
    pub async fn confirm(&self, booking_id: &str) -> DomainResult<Booking> {
        let mut booking = self.must_find(booking_id).await?;
        booking.confirm()?;
        self.bookings.update(booking.clone()).await?;
        info!(booking_id = %booking.id, "Booking confirmed");
        Ok(booking)
    }

    /// Cancel a booking on behalf of `actor_id` acting as `by`.
    pub async fn cancel(
        &self,
        booking_id: &str,
        actor_id: &str,
        by: CancelledBy,
        reason: Option<String>,
    ) -> DomainResult<Booking> {
        let mut booking = self.must_find(booking_id).await?;

        let allowed = match by {
            CancelledBy::Guest => actor_id == booking.guest_id,
            CancelledBy::Host => actor_id == booking.host_id,
            CancelledBy::Admin => true,
        };
        if !allowed {
            return Err(DomainError::Forbidden(format!(
                "Actor {} may not cancel booking {} as {}",
                actor_id, booking_id, by
            )));
        }

        booking.cancel(by, reason.clone())?;
        self.bookings.update(booking.clone()).await?;
        counter!("bookings_cancelled_total").increment(1);

        info!(booking_id = %booking.id, by = %by, "Booking cancelled");
        self.notifications.booking_cancelled(&booking, reason);
        Ok(booking)
    }

    /// Refund a paid booking through the processor.
    ///
    /// Only the booking's guest or host may refund. The processor call is
    /// never auto-retried; a second attempt after an ambiguous failure
    /// risks a double refund and is left to an operator.
    pub async fn refund(
        &self,
        booking_id: &str,
        actor_id: &str,
        amount: Option<Decimal>,
        reason: Option<String>,
    ) -> DomainResult<Booking> {
        let mut booking = self.must_find(booking_id).await?;

        let by = if actor_id == booking.guest_id {
            CancelledBy::Guest
        } else if actor_id == booking.host_id {
            CancelledBy::Host
        } else {
            return Err(DomainError::Forbidden(format!(
                "Actor {} is neither guest nor host of booking {}",
                actor_id, booking_id
            )));
        };

        if booking.payment_status != PaymentStatus::Paid {
            return Err(DomainError::Conflict(format!(
                "Booking {} has payment status {}, nothing to refund",
                booking_id, booking.payment_status
            )));
        }

        let intent_id = booking.payment_intent_id.clone().ok_or_else(|| {
            DomainError::Internal(format!(
                "Booking {} is paid but has no payment intent",
                booking_id
            ))
        })?;

        if let Some(a) = amount {
            if a <= Decimal::ZERO || a > booking.total_amount {
                return Err(DomainError::Validation(format!(
                    "Refund amount {} must be positive and at most {}",
                    a, booking.total_amount
                )));
            }
        }

        let outcome = self
            .with_payment_timeout(
                "refund",
                self.payments.refund(&intent_id, amount, reason.as_deref()),
            )
            .await?;

        booking.mark_refunded(by, reason.clone(), outcome.amount)?;
        self.bookings.update(booking.clone()).await?;
        counter!("refunds_issued_total").increment(1);

        info!(
            booking_id = %booking.id,
            refund_id = %outcome.refund_id,
            amount = %outcome.amount,
            "Refund issued"
        );

        self.notifications.booking_cancelled(&booking, reason);
        Ok(booking)
    }

    /// Mark a confirmed stay as finished.
    pub async fn complete(&self, booking_id: &str) -> DomainResult<Booking> {
        let mut booking = self.must_find(booking_id).await?;
        booking.complete()?;
        self.bookings.update(booking.clone()).await?;
        info!(booking_id = %booking.id, "Booking completed");
        Ok(booking)
    }

    /// Record that the guest never arrived.
    pub async fn mark_no_show(&self, booking_id: &str) -> DomainResult<Booking> {
        let mut booking = self.must_find(booking_id).await?;
        booking.mark_no_show()?;
        self.bookings.update(booking.clone()).await?;
        info!(booking_id = %booking.id, "Booking marked no-show");
        Ok(booking)
    }

    // ── Queries ────────────────────────────────────────────────

    pub async fn get(&self, booking_id: &str) -> DomainResult<Booking> {
        self.must_find(booking_id).await
    }

    pub async fn list_for_property(&self, property_id: &str) -> DomainResult<Vec<Booking>> {
        self.bookings.find_for_property(property_id).await
    }

    pub async fn list_for_guest(&self, guest_id: &str) -> DomainResult<Vec<Booking>> {
        self.bookings.find_for_guest(guest_id).await
    }

    pub async fn list_all(&self) -> DomainResult<Vec<Booking>> {
        self.bookings.find_all().await
    }

    async fn must_find(&self, booking_id: &str) -> DomainResult<Booking> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: booking_id.to_string(),
            })
    }
}

// ── Tests ──────────────────────────────────────────────────────
