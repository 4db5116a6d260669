//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::Booking;
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking
    async fn save(&self, booking: Booking) -> DomainResult<()>;

    /// Update an existing booking
    async fn update(&self, booking: Booking) -> DomainResult<()>;

    /// Find booking by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>>;

    /// Find the booking holding a given payment intent
    async fn find_by_intent(&self, payment_intent_id: &str) -> DomainResult<Option<Booking>>;

    /// Find calendar-holding bookings (status Pending or Confirmed) for a
    /// property whose half-open `[check_in, check_out)` range overlaps the
    /// given candidate range. `exclude_id` omits one booking, used when
    /// re-validating a booking being modified.
    async fn find_conflicting(
        &self,
        property_id: &str,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<Booking>>;

    /// All bookings for a property (any status)
    async fn find_for_property(&self, property_id: &str) -> DomainResult<Vec<Booking>>;

    /// All bookings made by a guest (any status)
    async fn find_for_guest(&self, guest_id: &str) -> DomainResult<Vec<Booking>>;

    /// All bookings (any status)
    async fn find_all(&self) -> DomainResult<Vec<Booking>>;
}
