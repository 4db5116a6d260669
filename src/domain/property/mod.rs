//! Property collaborator boundary
//!
//! Properties are owned by their own service; the booking core only reads
//! a snapshot of the price-relevant fields, referenced by id.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::DomainResult;

/// Read-only view of a property as the booking core needs it.
#[derive(Debug, Clone)]
pub struct PropertySnapshot {
    pub id: String,
    pub host_id: String,
    pub price_per_night: Decimal,
    pub cleaning_fee: Decimal,
    /// ISO 4217 currency code
    pub currency: String,
    pub max_guests: u32,
    pub is_active: bool,
    /// Bookings confirm automatically, without host approval
    pub instant_book: bool,
}

/// Lookup interface to the property-owning collaborator.
#[async_trait]
pub trait PropertyDirectory: Send + Sync {
    async fn get_property(&self, id: &str) -> DomainResult<Option<PropertySnapshot>>;
}
