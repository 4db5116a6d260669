//! Outbound notifications
//!
//! - `dispatcher`: fire-and-forget task dispatch around a [`Notifier`]
//! - [`LogNotifier`]: default sink that records sends in the log, used when
//!   no mail transport is wired up

pub mod dispatcher;

pub use dispatcher::{Notification, NotificationDispatcher};

use async_trait::async_trait;
use tracing::info;

use crate::application::ports::Notifier;
use crate::domain::{Booking, DomainResult};

/// Notifier that only logs. Stands in for the mail transport in local runs.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_guest_confirmation(&self, booking: &Booking) -> DomainResult<()> {
        info!(
            booking_id = %booking.id,
            guest_id = %booking.guest_id,
            total = %booking.total_amount,
            "✉️  Guest confirmation email"
        );
        Ok(())
    }

    async fn send_host_notification(&self, booking: &Booking) -> DomainResult<()> {
        info!(
            booking_id = %booking.id,
            host_id = %booking.host_id,
            check_in = %booking.check_in,
            check_out = %booking.check_out,
            "✉️  Host notification email"
        );
        Ok(())
    }

    async fn send_cancellation(&self, booking: &Booking, reason: Option<&str>) -> DomainResult<()> {
        info!(
            booking_id = %booking.id,
            reason = reason.unwrap_or("-"),
            "✉️  Cancellation email"
        );
        Ok(())
    }
}
