//! In-memory storage implementations
//!
//! Backs tests and embedded runs without a database. The booking map keeps
//! full `Booking` values; conflict detection reuses the same half-open
//! overlap rule as the SQL query.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::application::services::ranges_overlap;
use crate::domain::{
    Booking, BookingRepository, DomainError, DomainResult, PropertyDirectory, PropertySnapshot,
};

/// In-memory booking repository for development and testing
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: DashMap<String, Booking>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn save(&self, booking: Booking) -> DomainResult<()> {
        if self.bookings.contains_key(&booking.id) {
            return Err(DomainError::Conflict(format!(
                "Booking {} already exists",
                booking.id
            )));
        }
        self.bookings.insert(booking.id.clone(), booking);
        Ok(())
    }

    async fn update(&self, booking: Booking) -> DomainResult<()> {
        if !self.bookings.contains_key(&booking.id) {
            return Err(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: booking.id,
            });
        }
        self.bookings.insert(booking.id.clone(), booking);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(id).map(|b| b.clone()))
    }

    async fn find_by_intent(&self, payment_intent_id: &str) -> DomainResult<Option<Booking>> {
        Ok(self
            .bookings
            .iter()
            .find(|b| b.payment_intent_id.as_deref() == Some(payment_intent_id))
            .map(|b| b.clone()))
    }

    async fn find_conflicting(
        &self,
        property_id: &str,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.property_id == property_id)
            .filter(|b| b.status.holds_calendar())
            .filter(|b| Some(b.id.as_str()) != exclude_id)
            .filter(|b| ranges_overlap(b.check_in, b.check_out, check_in, check_out))
            .map(|b| b.clone())
            .collect())
    }

    async fn find_for_property(&self, property_id: &str) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.property_id == property_id)
            .map(|b| b.clone())
            .collect())
    }

    async fn find_for_guest(&self, guest_id: &str) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.guest_id == guest_id)
            .map(|b| b.clone())
            .collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        Ok(self.bookings.iter().map(|b| b.clone()).collect())
    }
}

/// In-memory property directory, seeded at startup
#[derive(Default)]
pub struct InMemoryPropertyDirectory {
    properties: DashMap<String, PropertySnapshot>,
}

impl InMemoryPropertyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, property: PropertySnapshot) {
        self.properties.insert(property.id.clone(), property);
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[async_trait]
impl PropertyDirectory for InMemoryPropertyDirectory {
    async fn get_property(&self, id: &str) -> DomainResult<Option<PropertySnapshot>> {
        Ok(self.properties.get(id).map(|p| p.clone()))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    use crate::domain::{GuestDetails, PricingRates};

    fn snapshot() -> PropertySnapshot {
        PropertySnapshot {
            id: "prop-1".into(),
            host_id: "host-1".into(),
            price_per_night: dec!(100),
            cleaning_fee: dec!(0),
            currency: "USD".into(),
            max_guests: 4,
            is_active: true,
            instant_book: false,
        }
    }

    fn booking(check_in_day: u32, check_out_day: u32) -> Booking {
        let check_in = Utc.with_ymd_and_hms(2025, 8, check_in_day, 0, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2025, 8, check_out_day, 0, 0, 0).unwrap();
        Booking::new(
            &snapshot(),
            "guest-1",
            check_in,
            check_out,
            GuestDetails {
                adults: 1,
                children: 0,
                infants: 0,
            },
            None,
            &PricingRates::default(),
        )
    }

    #[tokio::test]
    async fn save_then_find() {
        let repo = InMemoryBookingRepository::new();
        let b = booking(1, 5);
        let id = b.id.clone();
        repo.save(b).await.unwrap();
        assert!(repo.find_by_id(&id).await.unwrap().is_some());
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_save_conflicts() {
        let repo = InMemoryBookingRepository::new();
        let b = booking(1, 5);
        repo.save(b.clone()).await.unwrap();
        assert!(matches!(
            repo.save(b).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let repo = InMemoryBookingRepository::new();
        assert!(matches!(
            repo.update(booking(1, 5)).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn conflicts_respect_status_and_overlap() {
        let repo = InMemoryBookingRepository::new();
        let mut cancelled = booking(1, 5);
        cancelled
            .cancel(crate::domain::CancelledBy::Guest, None)
            .unwrap();
        let active = booking(10, 15);
        repo.save(cancelled.clone()).await.unwrap();
        repo.save(active.clone()).await.unwrap();

        let day = |d| Utc.with_ymd_and_hms(2025, 8, d, 0, 0, 0).unwrap();

        // Overlaps only the cancelled one: free.
        assert!(repo
            .find_conflicting("prop-1", day(2), day(4), None)
            .await
            .unwrap()
            .is_empty());

        // Overlaps the active one.
        let conflicts = repo
            .find_conflicting("prop-1", day(12), day(20), None)
            .await
            .unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, active.id);

        // Excluding the active booking itself clears the conflict.
        assert!(repo
            .find_conflicting("prop-1", day(12), day(20), Some(active.id.as_str()))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn find_by_intent_matches() {
        let repo = InMemoryBookingRepository::new();
        let mut b = booking(1, 3);
        b.payment_intent_id = Some("pi_123".into());
        let id = b.id.clone();
        repo.save(b).await.unwrap();

        let found = repo.find_by_intent("pi_123").await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(repo.find_by_intent("pi_nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn directory_upsert_and_get() {
        let dir = InMemoryPropertyDirectory::new();
        assert!(dir.is_empty());
        dir.upsert(snapshot());
        assert_eq!(dir.len(), 1);
        let p = dir.get_property("prop-1").await.unwrap().unwrap();
        assert_eq!(p.host_id, "host-1");
        assert!(dir.get_property("other").await.unwrap().is_none());
    }

    #[test]
    fn booking_duration_sanity() {
        let b = booking(1, 5);
        assert_eq!(b.check_out - b.check_in, Duration::days(4));
        assert_eq!(b.number_of_nights, 4);
    }
}
