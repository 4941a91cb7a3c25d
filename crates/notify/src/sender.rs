//! Delivery of a single stored notification.

use std::sync::Arc;

use cityevents_core::types::DbId;

use crate::delivery::MailTransport;
use crate::error::NotifyError;
use crate::store::{NotificationStore, UserDirectory};

/// What [`DeliverySender::send`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Mail handed to the transport and the row marked sent.
    Sent,
    /// The row was already sent; nothing happened.
    AlreadySent,
    /// The owner turned email off; the row stays unsent.
    EmailDisabled,
}

/// Performs the mail transport for one notification and marks it sent.
#[derive(Clone)]
pub struct DeliverySender {
    notifications: Arc<dyn NotificationStore>,
    users: Arc<dyn UserDirectory>,
    transport: Arc<dyn MailTransport>,
}

impl DeliverySender {
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        users: Arc<dyn UserDirectory>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            notifications,
            users,
            transport,
        }
    }

    /// Send the notification by email.
    ///
    /// A transport failure is returned as-is and leaves the row unsent; no
    /// retry is attempted here.
    ///
    /// The `is_sent` check happens before the mail goes out and `mark_sent`
    /// only after, so two concurrent sends of the same row can both mail the
    /// user. Callers must not queue more than one job per notification.
    pub async fn send(&self, notification_id: DbId) -> Result<SendOutcome, NotifyError> {
        let notification = self
            .notifications
            .find_notification(notification_id)
            .await?
            .ok_or(NotifyError::NotFound {
                entity: "notification",
                id: notification_id,
            })?;

        if notification.is_sent {
            tracing::debug!(notification_id, "Notification already sent");
            return Ok(SendOutcome::AlreadySent);
        }

        let user = self
            .users
            .find_user(notification.user_id)
            .await?
            .ok_or(NotifyError::NotFound {
                entity: "user",
                id: notification.user_id,
            })?;

        if !user.email_enabled {
            tracing::debug!(notification_id, user_id = user.id, "Email disabled, not sending");
            return Ok(SendOutcome::EmailDisabled);
        }

        self.transport
            .send_mail(&user.email, &notification.title, &notification.message)
            .await?;

        if !self.notifications.mark_sent(notification_id).await? {
            // Another sender finished first.
            tracing::warn!(notification_id, "Notification was marked sent concurrently");
        }

        tracing::info!(notification_id, user_id = user.id, "Notification delivered");
        Ok(SendOutcome::Sent)
    }
}
