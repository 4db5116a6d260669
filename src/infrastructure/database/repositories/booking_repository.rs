//! SeaORM implementation of BookingRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::booking::{
    Booking, BookingRepository, BookingStatus, Cancellation, CancelledBy, GuestDetails,
    PaymentStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::booking;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> Booking {
    let cancellation = m.cancelled_at.map(|cancelled_at| Cancellation {
        reason: m.cancel_reason.clone(),
        cancelled_at,
        cancelled_by: CancelledBy::from_str(m.cancelled_by.as_deref().unwrap_or("Admin")),
        refund_amount: m.refund_amount,
    });

    Booking {
        id: m.id,
        property_id: m.property_id,
        guest_id: m.guest_id,
        host_id: m.host_id,
        check_in: m.check_in,
        check_out: m.check_out,
        guests: GuestDetails {
            adults: m.adults.max(0) as u32,
            children: m.children.max(0) as u32,
            infants: m.infants.max(0) as u32,
        },
        price_per_night: m.price_per_night,
        number_of_nights: m.number_of_nights,
        subtotal: m.subtotal,
        service_fee: m.service_fee,
        cleaning_fee: m.cleaning_fee,
        tax_amount: m.tax_amount,
        total_amount: m.total_amount,
        currency: m.currency,
        status: BookingStatus::from_str(&m.status),
        payment_status: PaymentStatus::from_str(&m.payment_status),
        payment_intent_id: m.payment_intent_id,
        special_requests: m.special_requests,
        cancellation,
        confirmed_at: m.confirmed_at,
        completed_at: m.completed_at,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn to_active_model(b: Booking) -> booking::ActiveModel {
    let (cancel_reason, cancelled_at, cancelled_by, refund_amount) = match b.cancellation {
        Some(c) => (
            c.reason,
            Some(c.cancelled_at),
            Some(c.cancelled_by.as_str().to_string()),
            c.refund_amount,
        ),
        None => (None, None, None, None),
    };

    booking::ActiveModel {
        id: Set(b.id),
        property_id: Set(b.property_id),
        guest_id: Set(b.guest_id),
        host_id: Set(b.host_id),
        check_in: Set(b.check_in),
        check_out: Set(b.check_out),
        number_of_guests: Set(b.guests.total() as i32),
        adults: Set(b.guests.adults as i32),
        children: Set(b.guests.children as i32),
        infants: Set(b.guests.infants as i32),
        price_per_night: Set(b.price_per_night),
        number_of_nights: Set(b.number_of_nights),
        subtotal: Set(b.subtotal),
        service_fee: Set(b.service_fee),
        cleaning_fee: Set(b.cleaning_fee),
        tax_amount: Set(b.tax_amount),
        total_amount: Set(b.total_amount),
        currency: Set(b.currency),
        status: Set(b.status.as_str().to_string()),
        payment_status: Set(b.payment_status.as_str().to_string()),
        payment_intent_id: Set(b.payment_intent_id),
        special_requests: Set(b.special_requests),
        cancel_reason: Set(cancel_reason),
        cancelled_at: Set(cancelled_at),
        cancelled_by: Set(cancelled_by),
        refund_amount: Set(refund_amount),
        confirmed_at: Set(b.confirmed_at),
        completed_at: Set(b.completed_at),
        created_at: Set(b.created_at),
        updated_at: Set(b.updated_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Internal(format!("Database error: {}", e))
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn save(&self, b: Booking) -> DomainResult<()> {
        debug!("Saving booking: {}", b.id);
        to_active_model(b).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, b: Booking) -> DomainResult<()> {
        debug!("Updating booking: {}", b.id);

        let existing = booking::Entity::find_by_id(&b.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: b.id,
            });
        }

        to_active_model(b).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_intent(&self, payment_intent_id: &str) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find()
            .filter(booking::Column::PaymentIntentId.eq(payment_intent_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_conflicting(
        &self,
        property_id: &str,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<Booking>> {
        // Half-open overlap: [a, b) and [c, d) intersect iff a < d && c < b.
        let mut query = booking::Entity::find()
            .filter(booking::Column::PropertyId.eq(property_id))
            .filter(booking::Column::Status.is_in(["Pending", "Confirmed"]))
            .filter(booking::Column::CheckIn.lt(check_out))
            .filter(booking::Column::CheckOut.gt(check_in));

        if let Some(id) = exclude_id {
            query = query.filter(booking::Column::Id.ne(id));
        }

        let models = query.all(&self.db).await.map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_for_property(&self, property_id: &str) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::PropertyId.eq(property_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_for_guest(&self, guest_id: &str) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::GuestId.eq(guest_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
