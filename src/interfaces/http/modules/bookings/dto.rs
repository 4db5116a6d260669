//! Booking DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::booking::{Booking, GuestDetails};
use crate::domain::pricing::PricingQuote;

/// Guest headcount for a stay
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct GuestDetailsDto {
    /// At least one adult is required per booking
    #[validate(range(min = 1, max = 32))]
    pub adults: u32,
    #[serde(default)]
    #[validate(range(max = 32))]
    pub children: u32,
    #[serde(default)]
    #[validate(range(max = 32))]
    pub infants: u32,
}

impl From<GuestDetailsDto> for GuestDetails {
    fn from(dto: GuestDetailsDto) -> Self {
        GuestDetails {
            adults: dto.adults,
            children: dto.children,
            infants: dto.infants,
        }
    }
}

/// Request to book a property for a date range
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, max = 64))]
    pub property_id: String,
    #[validate(length(min = 1, max = 64))]
    pub guest_id: String,
    /// Check-in instant (ISO 8601)
    pub check_in: String,
    /// Check-out instant (ISO 8601), must be after check-in
    pub check_out: String,
    /// Total headcount, must equal the sum of the guest breakdown
    #[validate(range(min = 1, max = 64))]
    pub number_of_guests: u32,
    #[validate(nested)]
    pub guests: GuestDetailsDto,
    #[validate(length(max = 1000))]
    pub special_requests: Option<String>,
}

/// Booking details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub property_id: String,
    pub guest_id: String,
    pub host_id: String,
    pub check_in: String,
    pub check_out: String,
    pub number_of_nights: i64,
    pub number_of_guests: u32,
    pub subtotal: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub status: String,
    pub payment_status: String,
    pub payment_intent_id: Option<String>,
    pub special_requests: Option<String>,
    pub cancellation: Option<CancellationDto>,
    pub confirmed_at: Option<String>,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Cancellation metadata attached to a cancelled or refunded booking
#[derive(Debug, Serialize, ToSchema)]
pub struct CancellationDto {
    pub reason: Option<String>,
    pub cancelled_by: String,
    pub cancelled_at: String,
    pub refund_amount: Option<Decimal>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            property_id: b.property_id,
            guest_id: b.guest_id,
            host_id: b.host_id,
            check_in: b.check_in.to_rfc3339(),
            check_out: b.check_out.to_rfc3339(),
            number_of_nights: b.number_of_nights,
            number_of_guests: b.guests.total(),
            subtotal: b.subtotal,
            cleaning_fee: b.cleaning_fee,
            service_fee: b.service_fee,
            tax_amount: b.tax_amount,
            total_amount: b.total_amount,
            currency: b.currency,
            status: b.status.as_str().to_string(),
            payment_status: b.payment_status.as_str().to_string(),
            payment_intent_id: b.payment_intent_id,
            special_requests: b.special_requests,
            cancellation: b.cancellation.map(|c| CancellationDto {
                reason: c.reason,
                cancelled_by: c.cancelled_by.as_str().to_string(),
                cancelled_at: c.cancelled_at.to_rfc3339(),
                refund_amount: c.refund_amount,
            }),
            confirmed_at: b.confirmed_at.map(|t| t.to_rfc3339()),
            completed_at: b.completed_at.map(|t| t.to_rfc3339()),
            created_at: b.created_at.to_rfc3339(),
            updated_at: b.updated_at.to_rfc3339(),
        }
    }
}

/// Response from creating a booking
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookingResponse {
    pub booking: BookingDto,
    /// Price breakdown at booking time
    pub pricing: PricingQuote,
    /// Payment client secret for completing the charge
    pub client_secret: String,
}

/// Request to cancel a booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelBookingRequest {
    /// ID of the user requesting the cancellation
    #[validate(length(min = 1, max = 64))]
    pub actor_id: String,
    /// "guest", "host" or "admin"
    pub cancelled_by: String,
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Request to refund a paid booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefundBookingRequest {
    #[validate(length(min = 1, max = 64))]
    pub actor_id: String,
    /// Partial refund amount. Omit for a full refund
    pub amount: Option<Decimal>,
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Request to confirm a payment after the guest completed the charge
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ConfirmPaymentRequest {
    #[validate(length(min = 1, max = 128))]
    pub payment_intent_id: String,
}

/// Optional filters for listing bookings
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub property_id: Option<String>,
    pub guest_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_breakdown_rejects_oversized_counts() {
        let dto = GuestDetailsDto {
            adults: 1,
            children: u32::MAX,
            infants: 0,
        };
        let errs = dto.validate().unwrap_err();
        assert!(errs.field_errors().contains_key("children"));

        let dto = GuestDetailsDto {
            adults: 2,
            children: 1,
            infants: 33,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn guest_breakdown_within_bounds_passes() {
        let dto = GuestDetailsDto {
            adults: 2,
            children: 2,
            infants: 1,
        };
        assert!(dto.validate().is_ok());
    }
}
