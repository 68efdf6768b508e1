//! Fire-and-forget notification facade.
//!
//! [`Notifier`] is what request handlers hold: publishing a domain event is
//! synchronous and infallible, and outbound email is spawned onto the
//! runtime so it can neither block the caller's response nor roll back a
//! committed mutation. Delivery failures are logged and swallowed.

use std::sync::Arc;

use crate::bus::{DomainEvent, EventBus};
use crate::delivery::email::{EmailConfig, EmailDelivery};

/// A rendered outbound message.
#[derive(Debug, Clone)]
pub struct Notification {
    pub subject: String,
    /// Rendered HTML body.
    pub body: String,
    pub recipient: String,
    /// IP the triggering request came from, for the audit trail.
    pub origin_ip: Option<String>,
}

/// Shared notification facade: event bus plus optional SMTP delivery.
#[derive(Clone)]
pub struct Notifier {
    bus: Arc<EventBus>,
    email: Option<Arc<EmailDelivery>>,
}

impl Notifier {
    /// Create a notifier over the given bus.
    ///
    /// When `email_config` is `None` (no `SMTP_HOST`), outbound mail is
    /// disabled and enqueued messages are only logged.
    pub fn new(bus: Arc<EventBus>, email_config: Option<EmailConfig>) -> Self {
        Self {
            bus,
            email: email_config.map(|c| Arc::new(EmailDelivery::new(c))),
        }
    }

    /// Publish a domain event to in-process subscribers.
    pub fn publish(&self, event: DomainEvent) {
        self.bus.publish(event);
    }

    /// Enqueue an outbound message, fire-and-forget.
    ///
    /// Returns as soon as the send task is spawned; the caller's response
    /// never waits on SMTP.
    pub fn enqueue(&self, notification: Notification) {
        let Some(delivery) = self.email.clone() else {
            tracing::debug!(
                recipient = %notification.recipient,
                subject = %notification.subject,
                "Email delivery not configured; dropping notification"
            );
            return;
        };

        tokio::spawn(async move {
            match delivery
                .deliver(&notification.recipient, &notification.subject, &notification.body)
                .await
            {
                Ok(()) => tracing::info!(
                    recipient = %notification.recipient,
                    subject = %notification.subject,
                    origin_ip = ?notification.origin_ip,
                    "Notification email sent"
                ),
                Err(e) => tracing::error!(
                    recipient = %notification.recipient,
                    error = %e,
                    "Notification email failed"
                ),
            }
        });
    }
}
