//! Fire-and-forget notification dispatch
//!
//! Emails are enqueued as detached tokio tasks after the booking mutation
//! has been persisted. A failed send is logged and dropped; a booking's
//! success never depends on email delivery.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::ports::Notifier;
use crate::domain::Booking;

/// One outbound email.
#[derive(Debug, Clone)]
pub enum Notification {
    GuestConfirmation(Booking),
    HostNotification(Booking),
    Cancellation {
        booking: Booking,
        reason: Option<String>,
    },
}

impl Notification {
    fn kind(&self) -> &'static str {
        match self {
            Self::GuestConfirmation(_) => "guest_confirmation",
            Self::HostNotification(_) => "host_notification",
            Self::Cancellation { .. } => "cancellation",
        }
    }

    fn booking_id(&self) -> &str {
        match self {
            Self::GuestConfirmation(b) | Self::HostNotification(b) => &b.id,
            Self::Cancellation { booking, .. } => &booking.id,
        }
    }
}

/// Hands notifications off to detached send tasks.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Spawn the send and return immediately.
    pub fn enqueue(&self, notification: Notification) {
        let notifier = Arc::clone(&self.notifier);
        let kind = notification.kind();
        let booking_id = notification.booking_id().to_string();
        debug!(kind, booking_id = %booking_id, "Notification enqueued");

        tokio::spawn(async move {
            let result = match &notification {
                Notification::GuestConfirmation(booking) => {
                    notifier.send_guest_confirmation(booking).await
                }
                Notification::HostNotification(booking) => {
                    notifier.send_host_notification(booking).await
                }
                Notification::Cancellation { booking, reason } => {
                    notifier.send_cancellation(booking, reason.as_deref()).await
                }
            };

            if let Err(e) = result {
                warn!(kind, booking_id = %booking_id, error = %e, "Notification send failed");
            }
        });
    }

    /// Guest confirmation plus host notification for a finalized booking.
    pub fn booking_confirmed(&self, booking: &Booking) {
        self.enqueue(Notification::GuestConfirmation(booking.clone()));
        self.enqueue(Notification::HostNotification(booking.clone()));
    }

    pub fn booking_cancelled(&self, booking: &Booking, reason: Option<String>) {
        self.enqueue(Notification::Cancellation {
            booking: booking.clone(),
            reason,
        });
    }
}
