//! Property availability DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Date range to probe for availability
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Check-in instant (ISO 8601)
    pub check_in: String,
    /// Check-out instant (ISO 8601)
    pub check_out: String,
}

/// Availability verdict for a property and date range
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub property_id: String,
    pub check_in: String,
    pub check_out: String,
    pub available: bool,
    /// Number of bookings holding the calendar in this range
    pub conflicting_bookings: usize,
}
