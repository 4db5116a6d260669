//! Availability checker
//!
//! Read-only overlap detection against the booking collection, scoped to
//! one property. Two half-open ranges `[a, b)` and `[c, d)` overlap iff
//! `a < d && c < b`; the check-out day itself is free for a new check-in.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Booking, BookingRepository, DomainResult};

/// Half-open interval overlap test.
///
/// Back-to-back stays (`a_end == b_start`) do not overlap: same-day
/// turnover is allowed.
pub fn ranges_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Service answering "can this property be booked for these dates?".
#[derive(Clone)]
pub struct AvailabilityService {
    bookings: Arc<dyn BookingRepository>,
}

impl AvailabilityService {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    /// `true` iff no pending or confirmed booking for `property_id`
    /// overlaps `[check_in, check_out)`. Cancelled, completed, refunded and
    /// no-show bookings never hold the calendar.
    pub async fn is_available(
        &self,
        property_id: &str,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        exclude_booking_id: Option<&str>,
    ) -> DomainResult<bool> {
        let conflicts = self
            .conflicts(property_id, check_in, check_out, exclude_booking_id)
            .await?;
        Ok(conflicts.is_empty())
    }

    /// The conflicting bookings themselves, for diagnostics and tests.
    pub async fn conflicts(
        &self,
        property_id: &str,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        exclude_booking_id: Option<&str>,
    ) -> DomainResult<Vec<Booking>> {
        self.bookings
            .find_conflicting(property_id, check_in, check_out, exclude_booking_id)
            .await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn overlapping_ranges() {
        // candidate starts during existing stay
        assert!(ranges_overlap(day(3), day(6), day(1), day(4)));
        // candidate ends during existing stay
        assert!(ranges_overlap(day(1), day(4), day(3), day(6)));
        // candidate fully contains existing stay
        assert!(ranges_overlap(day(1), day(10), day(3), day(5)));
        // existing fully contains candidate
        assert!(ranges_overlap(day(3), day(5), day(1), day(10)));
        // identical ranges
        assert!(ranges_overlap(day(2), day(5), day(2), day(5)));
    }

    #[test]
    fn back_to_back_stays_do_not_overlap() {
        // new check-in on the existing check-out day
        assert!(!ranges_overlap(day(5), day(8), day(1), day(5)));
        // and the other way around
        assert!(!ranges_overlap(day(1), day(5), day(5), day(8)));
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        assert!(!ranges_overlap(day(1), day(3), day(10), day(12)));
        assert!(!ranges_overlap(day(10), day(12), day(1), day(3)));
    }
}
