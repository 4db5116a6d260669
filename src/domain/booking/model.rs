//! Booking domain entity
//!
//! Owns the status / payment-status state machine and the derived-pricing
//! invariant: `number_of_nights`, `subtotal` and `total_amount` are never
//! set directly, they always come out of [`reprice`](Booking::reprice).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::pricing::{nights_between, PricingRates};
use crate::domain::property::PropertySnapshot;

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    /// Awaiting host approval or payment
    Pending,
    /// Approved (instant-book or host), dates are held
    Confirmed,
    /// Cancelled by guest, host or admin
    Cancelled,
    /// Stay finished
    Completed,
    /// Cancelled with money returned
    Refunded,
    /// Guest never arrived
    NoShow,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
            Self::Refunded => "Refunded",
            Self::NoShow => "NoShow",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Confirmed" => Self::Confirmed,
            "Cancelled" => Self::Cancelled,
            "Completed" => Self::Completed,
            "Refunded" => Self::Refunded,
            "NoShow" => Self::NoShow,
            _ => Self::Cancelled,
        }
    }

    /// Terminal states admit no further status transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::Completed | Self::Refunded | Self::NoShow
        )
    }

    /// Only pending and confirmed bookings occupy the calendar.
    pub fn holds_calendar(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status, coupled to but distinct from the booking status.
///
/// `Confirmed` + `Pending` is a supported intermediate state
/// (host approved, payment not yet captured).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    PartiallyPaid,
    Refunded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::PartiallyPaid => "PartiallyPaid",
            Self::Refunded => "Refunded",
            Self::Failed => "Failed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Paid" => Self::Paid,
            "PartiallyPaid" => Self::PartiallyPaid,
            "Refunded" => Self::Refunded,
            "Failed" => Self::Failed,
            _ => Self::Failed,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who requested a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelledBy {
    Guest,
    Host,
    Admin,
}

impl CancelledBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "Guest",
            Self::Host => "Host",
            Self::Admin => "Admin",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Guest" => Self::Guest,
            "Host" => Self::Host,
            _ => Self::Admin,
        }
    }
}

impl std::fmt::Display for CancelledBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cancellation metadata, present only once a booking is cancelled.
#[derive(Debug, Clone, PartialEq)]
pub struct Cancellation {
    pub reason: Option<String>,
    pub cancelled_at: DateTime<Utc>,
    pub cancelled_by: CancelledBy,
    /// Amount returned to the guest, set by the refund flow.
    pub refund_amount: Option<Decimal>,
}

/// Guest head-count breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestDetails {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl GuestDetails {
    pub fn total(&self) -> u32 {
        self.adults
            .saturating_add(self.children)
            .saturating_add(self.infants)
    }
}

/// One reservation of one property by one guest for one date range.
///
/// Property, guest and host are referenced by id only; snapshots of
/// price-relevant property fields (`price_per_night`, `cleaning_fee`) are
/// copied in at creation and refreshed by the payment-confirmation flow.
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: String,
    pub property_id: String,
    pub guest_id: String,
    pub host_id: String,
    /// Half-open stay range: the check-out day itself is not occupied.
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub guests: GuestDetails,
    pub price_per_night: Decimal,
    pub number_of_nights: i64,
    pub subtotal: Decimal,
    pub service_fee: Decimal,
    pub cleaning_fee: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    /// ISO 4217 currency code, taken from the property.
    pub currency: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_intent_id: Option<String>,
    pub special_requests: Option<String>,
    pub cancellation: Option<Cancellation>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build a new booking for `property`.
    ///
    /// Starts `Confirmed` when the property has instant-book enabled, else
    /// `Pending`. Derived amounts are computed through `rates` immediately;
    /// the caller has already validated range, capacity and availability.
    pub fn new(
        property: &PropertySnapshot,
        guest_id: impl Into<String>,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        guests: GuestDetails,
        special_requests: Option<String>,
        rates: &PricingRates,
    ) -> Self {
        let now = Utc::now();
        let (status, confirmed_at) = if property.instant_book {
            (BookingStatus::Confirmed, Some(now))
        } else {
            (BookingStatus::Pending, None)
        };

        let mut booking = Self {
            id: uuid::Uuid::new_v4().to_string(),
            property_id: property.id.clone(),
            guest_id: guest_id.into(),
            host_id: property.host_id.clone(),
            check_in,
            check_out,
            guests,
            price_per_night: property.price_per_night,
            number_of_nights: 0,
            subtotal: Decimal::ZERO,
            service_fee: Decimal::ZERO,
            cleaning_fee: property.cleaning_fee,
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            currency: property.currency.clone(),
            status,
            payment_status: PaymentStatus::Pending,
            payment_intent_id: None,
            special_requests,
            cancellation: None,
            confirmed_at,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        booking.reprice(rates);
        booking
    }

    /// Recompute all derived amounts from the current price-relevant fields.
    ///
    /// Must be called before persisting whenever `check_in`, `check_out`,
    /// `price_per_night` or `cleaning_fee` changed — stale derived fields
    /// are a correctness bug, and there is no hidden save hook doing this.
    pub fn reprice(&mut self, rates: &PricingRates) {
        self.number_of_nights = nights_between(self.check_in, self.check_out);
        let quote = rates.quote(self.price_per_night, self.number_of_nights, self.cleaning_fee);
        self.subtotal = quote.subtotal;
        self.service_fee = quote.service_fee;
        self.cleaning_fee = quote.cleaning_fee;
        self.tax_amount = quote.tax;
        self.total_amount = quote.total;
        self.updated_at = Utc::now();
    }

    /// Approve a pending booking.
    pub fn confirm(&mut self) -> DomainResult<()> {
        if self.status != BookingStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "Booking {} cannot be confirmed from status {}",
                self.id, self.status
            )));
        }
        self.status = BookingStatus::Confirmed;
        self.confirmed_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Cancel this booking.
    ///
    /// Permitted from any non-terminal state. A second cancel fails with
    /// `Conflict` and leaves the original cancellation metadata untouched.
    pub fn cancel(&mut self, by: CancelledBy, reason: Option<String>) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::Conflict(format!(
                "Booking {} is already {} and cannot be cancelled",
                self.id, self.status
            )));
        }
        self.status = BookingStatus::Cancelled;
        self.cancellation = Some(Cancellation {
            reason,
            cancelled_at: Utc::now(),
            cancelled_by: by,
            refund_amount: None,
        });
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mark the stay finished. Eligibility (post-checkout) is the caller's call.
    pub fn complete(&mut self) -> DomainResult<()> {
        if self.status != BookingStatus::Confirmed {
            return Err(DomainError::Conflict(format!(
                "Booking {} cannot be completed from status {}",
                self.id, self.status
            )));
        }
        self.status = BookingStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record that the guest never arrived.
    pub fn mark_no_show(&mut self) -> DomainResult<()> {
        if self.status != BookingStatus::Confirmed {
            return Err(DomainError::Conflict(format!(
                "Booking {} cannot be marked no-show from status {}",
                self.id, self.status
            )));
        }
        self.status = BookingStatus::NoShow;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Payment captured by the processor.
    pub fn mark_paid(&mut self) -> DomainResult<()> {
        if self.payment_status != PaymentStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "Booking {} payment cannot move to Paid from {}",
                self.id, self.payment_status
            )));
        }
        self.payment_status = PaymentStatus::Paid;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Payment declined or errored at the processor.
    pub fn mark_payment_failed(&mut self) -> DomainResult<()> {
        if !matches!(
            self.payment_status,
            PaymentStatus::Pending | PaymentStatus::Paid
        ) {
            return Err(DomainError::Conflict(format!(
                "Booking {} payment cannot move to Failed from {}",
                self.id, self.payment_status
            )));
        }
        self.payment_status = PaymentStatus::Failed;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Settle a processor refund: payment goes `Paid -> Refunded`, the
    /// booking is cancelled and the refund amount recorded.
    pub fn mark_refunded(
        &mut self,
        by: CancelledBy,
        reason: Option<String>,
        amount: Decimal,
    ) -> DomainResult<()> {
        if self.payment_status != PaymentStatus::Paid {
            return Err(DomainError::Conflict(format!(
                "Booking {} cannot be refunded with payment status {}",
                self.id, self.payment_status
            )));
        }
        self.payment_status = PaymentStatus::Refunded;
        self.status = BookingStatus::Cancelled;
        self.cancellation = Some(Cancellation {
            reason,
            cancelled_at: Utc::now(),
            cancelled_by: by,
            refund_amount: Some(amount),
        });
        self.updated_at = Utc::now();
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn property(instant_book: bool) -> PropertySnapshot {
        PropertySnapshot {
            id: "prop-1".into(),
            host_id: "host-1".into(),
            price_per_night: dec!(100),
            cleaning_fee: dec!(50),
            currency: "USD".into(),
            max_guests: 4,
            is_active: true,
            instant_book,
        }
    }

    fn sample_booking(instant_book: bool) -> Booking {
        let check_in = Utc.with_ymd_and_hms(2025, 6, 1, 15, 0, 0).unwrap();
        Booking::new(
            &property(instant_book),
            "guest-1",
            check_in,
            check_in + Duration::days(3),
            GuestDetails {
                adults: 2,
                children: 1,
                infants: 0,
            },
            None,
            &PricingRates::default(),
        )
    }

    #[test]
    fn new_booking_derives_pricing() {
        let b = sample_booking(false);
        assert_eq!(b.number_of_nights, 3);
        assert_eq!(b.subtotal, dec!(300.00));
        assert_eq!(b.service_fee, dec!(9.00));
        assert_eq!(b.tax_amount, dec!(35.90));
        assert_eq!(b.total_amount, dec!(394.90));
        assert_eq!(b.status, BookingStatus::Pending);
        assert_eq!(b.payment_status, PaymentStatus::Pending);
        assert_eq!(b.host_id, "host-1");
    }

    #[test]
    fn guest_total_saturates_instead_of_wrapping() {
        let g = GuestDetails {
            adults: 1,
            children: u32::MAX,
            infants: 0,
        };
        assert_eq!(g.total(), u32::MAX);
    }

    #[test]
    fn instant_book_starts_confirmed() {
        let b = sample_booking(true);
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert!(b.confirmed_at.is_some());
        // Payment is still outstanding even when instantly confirmed.
        assert_eq!(b.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn reprice_tracks_changed_dates() {
        let mut b = sample_booking(false);
        b.check_out = b.check_in + Duration::days(5);
        b.reprice(&PricingRates::default());
        assert_eq!(b.number_of_nights, 5);
        assert_eq!(b.subtotal, dec!(500.00));
        assert_eq!(
            b.total_amount,
            b.subtotal + b.cleaning_fee + b.service_fee + b.tax_amount
        );
    }

    #[test]
    fn confirm_only_from_pending() {
        let mut b = sample_booking(false);
        assert!(b.confirm().is_ok());
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert!(b.confirmed_at.is_some());

        let err = b.confirm().unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn cancel_from_pending_and_confirmed() {
        let mut pending = sample_booking(false);
        assert!(pending.cancel(CancelledBy::Guest, Some("changed plans".into())).is_ok());
        assert_eq!(pending.status, BookingStatus::Cancelled);

        let mut confirmed = sample_booking(true);
        assert!(confirmed.cancel(CancelledBy::Host, None).is_ok());
        let c = confirmed.cancellation.unwrap();
        assert_eq!(c.cancelled_by, CancelledBy::Host);
        assert_eq!(c.refund_amount, None);
    }

    #[test]
    fn second_cancel_is_rejected_and_metadata_untouched() {
        let mut b = sample_booking(false);
        b.cancel(CancelledBy::Guest, Some("first".into())).unwrap();
        let original = b.cancellation.clone().unwrap();

        let err = b.cancel(CancelledBy::Admin, Some("second".into())).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(b.cancellation.unwrap(), original);
    }

    #[test]
    fn complete_requires_confirmed() {
        let mut b = sample_booking(true);
        assert!(b.complete().is_ok());
        assert_eq!(b.status, BookingStatus::Completed);
        assert!(b.completed_at.is_some());

        let mut pending = sample_booking(false);
        assert!(pending.complete().is_err());
    }

    #[test]
    fn no_show_requires_confirmed() {
        let mut b = sample_booking(true);
        assert!(b.mark_no_show().is_ok());
        assert_eq!(b.status, BookingStatus::NoShow);
        assert!(b.status.is_terminal());

        let mut pending = sample_booking(false);
        assert!(pending.mark_no_show().is_err());
    }

    #[test]
    fn terminal_states_block_cancellation() {
        let mut b = sample_booking(true);
        b.complete().unwrap();
        assert!(matches!(
            b.cancel(CancelledBy::Admin, None),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn payment_lifecycle() {
        let mut b = sample_booking(true);
        b.mark_paid().unwrap();
        assert_eq!(b.payment_status, PaymentStatus::Paid);
        // Double capture is rejected.
        assert!(b.mark_paid().is_err());

        b.mark_refunded(CancelledBy::Guest, Some("trip cancelled".into()), dec!(394.90))
            .unwrap();
        assert_eq!(b.payment_status, PaymentStatus::Refunded);
        assert_eq!(b.status, BookingStatus::Cancelled);
        assert_eq!(
            b.cancellation.unwrap().refund_amount,
            Some(dec!(394.90))
        );
    }

    #[test]
    fn refund_requires_captured_payment() {
        let mut b = sample_booking(false);
        let err = b
            .mark_refunded(CancelledBy::Guest, None, dec!(10))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn payment_failure_from_pending_or_paid_only() {
        let mut b = sample_booking(false);
        b.mark_payment_failed().unwrap();
        assert_eq!(b.payment_status, PaymentStatus::Failed);
        assert!(b.mark_payment_failed().is_err());
    }

    #[test]
    fn status_string_roundtrip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
            BookingStatus::Refunded,
            BookingStatus::NoShow,
        ] {
            assert_eq!(BookingStatus::from_str(status.as_str()), status);
        }
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::PartiallyPaid,
            PaymentStatus::Refunded,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn only_pending_and_confirmed_hold_calendar() {
        assert!(BookingStatus::Pending.holds_calendar());
        assert!(BookingStatus::Confirmed.holds_calendar());
        assert!(!BookingStatus::Cancelled.holds_calendar());
        assert!(!BookingStatus::Completed.holds_calendar());
        assert!(!BookingStatus::Refunded.holds_calendar());
        assert!(!BookingStatus::NoShow.holds_calendar());
    }
}
