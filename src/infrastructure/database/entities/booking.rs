//! Booking entity

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub property_id: String,
    pub guest_id: String,
    pub host_id: String,

    pub check_in: DateTimeUtc,
    pub check_out: DateTimeUtc,

    pub number_of_guests: i32,
    pub adults: i32,
    pub children: i32,
    pub infants: i32,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price_per_night: Decimal,
    pub number_of_nights: i64,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub service_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub cleaning_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub tax_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_amount: Decimal,
    pub currency: String,

    /// Booking status: Pending, Confirmed, Cancelled, Completed, Refunded, NoShow
    pub status: String,
    /// Payment status: Pending, Paid, PartiallyPaid, Refunded, Failed
    pub payment_status: String,

    #[sea_orm(nullable)]
    pub payment_intent_id: Option<String>,
    #[sea_orm(nullable)]
    pub special_requests: Option<String>,

    #[sea_orm(nullable)]
    pub cancel_reason: Option<String>,
    #[sea_orm(nullable)]
    pub cancelled_at: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub cancelled_by: Option<String>,
    #[sea_orm(nullable, column_type = "Decimal(Some((10, 2)))")]
    pub refund_amount: Option<Decimal>,

    #[sea_orm(nullable)]
    pub confirmed_at: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub completed_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
