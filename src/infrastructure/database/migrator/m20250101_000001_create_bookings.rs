//! Create bookings table
//!
//! One row per reservation. The composite index on
//! (property_id, status, check_in, check_out) backs the conflict query;
//! payment_intent_id is indexed for the payment-confirmation lookup.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::PropertyId).string().not_null())
                    .col(ColumnDef::new(Bookings::GuestId).string().not_null())
                    .col(ColumnDef::new(Bookings::HostId).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::CheckIn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::CheckOut)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::NumberOfGuests)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::Adults).integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::Children)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Bookings::Infants)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Bookings::PricePerNight)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::NumberOfNights)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::Subtotal)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::ServiceFee)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::CleaningFee)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::TaxAmount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::TotalAmount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::Currency)
                            .string()
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::PaymentStatus)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Bookings::PaymentIntentId).string())
                    .col(ColumnDef::new(Bookings::SpecialRequests).string())
                    .col(ColumnDef::new(Bookings::CancelReason).string())
                    .col(ColumnDef::new(Bookings::CancelledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Bookings::CancelledBy).string())
                    .col(ColumnDef::new(Bookings::RefundAmount).decimal_len(10, 2))
                    .col(ColumnDef::new(Bookings::ConfirmedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Bookings::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_property_calendar")
                    .table(Bookings::Table)
                    .col(Bookings::PropertyId)
                    .col(Bookings::Status)
                    .col(Bookings::CheckIn)
                    .col(Bookings::CheckOut)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_payment_intent")
                    .table(Bookings::Table)
                    .col(Bookings::PaymentIntentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_guest")
                    .table(Bookings::Table)
                    .col(Bookings::GuestId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    PropertyId,
    GuestId,
    HostId,
    CheckIn,
    CheckOut,
    NumberOfGuests,
    Adults,
    Children,
    Infants,
    PricePerNight,
    NumberOfNights,
    Subtotal,
    ServiceFee,
    CleaningFee,
    TaxAmount,
    TotalAmount,
    Currency,
    Status,
    PaymentStatus,
    PaymentIntentId,
    SpecialRequests,
    CancelReason,
    CancelledAt,
    CancelledBy,
    RefundAmount,
    ConfirmedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}
