//! Builds notification rows and enqueues their delivery.
//!
//! Every build operation persists a [`Notification`] before enqueueing the
//! matching [`Job::SendNotification`]. Failures on a single event or user are
//! logged and skipped; returned counts cover successes only.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use cityevents_core::catalog::{EventStatus, InteractionKind};
use cityevents_core::notification::{
    cancelled_content, digest_content, digest_window_start, local_day_start, reminder_content,
    reminder_target_date, update_content, DigestLine, NotificationContent, NotificationFrequency, NotificationKind, DIGEST_MAX_EVENTS,
};
use cityevents_core::types::DbId;
use cityevents_db::models::event::Event;
use cityevents_db::models::notification::{CreateNotification, Notification};
use cityevents_db::models::user::User;

use crate::error::NotifyError;
use crate::queue::{Job, JobQueue};
use crate::store::{EventCatalog, NotificationStore, UserDirectory};

/// Decides who gets notified and writes the notification records.
#[derive(Clone)]
pub struct Dispatcher {
    catalog: Arc<dyn EventCatalog>,
    users: Arc<dyn UserDirectory>,
    notifications: Arc<dyn NotificationStore>,
    queue: Arc<dyn JobQueue>,
    utc_offset: FixedOffset,
}

impl Dispatcher {
    pub fn new(
        catalog: Arc<dyn EventCatalog>,
        users: Arc<dyn UserDirectory>,
        notifications: Arc<dyn NotificationStore>,
        queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            catalog,
            users,
            notifications,
            queue,
            utc_offset: Utc.fix(),
        }
    }

    /// Zone in which digest windows start at local midnight (default UTC).
    pub fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    // -----------------------------------------------------------------------
    // Reminders
    // -----------------------------------------------------------------------

    /// Remind every `going` user with email enabled about published events
    /// starting the day after `today`.
    ///
    /// Returns the number of reminders created.
    pub async fn build_reminders(&self, today: NaiveDate) -> Result<usize, NotifyError> {
        let target = reminder_target_date(today);
        let events = self
            .catalog
            .events_starting_on(target, EventStatus::Published)
            .await?;

        let mut created = 0;
        for event in &events {
            match self.remind_event(event).await {
                Ok(n) => created += n,
                Err(e) => {
                    tracing::error!(event_id = event.id, error = %e, "Failed to build reminders for event");
                }
            }
        }

        tracing::info!(date = %target, events = events.len(), created, "Reminders built");
        Ok(created)
    }

    async fn remind_event(&self, event: &Event) -> Result<usize, NotifyError> {
        let user_ids = self
            .catalog
            .interacting_user_ids(event.id, Some(InteractionKind::Going))
            .await?;

        let content = reminder_content(&event.title, event.start_time, &event.address);
        let mut created = 0;
        for user_id in user_ids {
            let Some(user) = self.mail_recipient(user_id).await else {
                continue;
            };
            if self
                .record_and_enqueue(
                    &user,
                    Some(event.id),
                    NotificationKind::EventReminder,
                    content.clone(),
                )
                .await
                .is_some()
            {
                created += 1;
            }
        }
        Ok(created)
    }

    // -----------------------------------------------------------------------
    // Digest
    // -----------------------------------------------------------------------

    /// Send each daily/weekly subscriber one digest of new events in their
    /// city, if there are any.
    ///
    /// Returns the number of digests created.
    pub async fn build_digest(&self, today: NaiveDate) -> Result<usize, NotifyError> {
        let recipients = self.users.digest_recipients().await?;

        let mut created = 0;
        for user in &recipients {
            match self.digest_for_user(user, today).await {
                Ok(Some(_)) => created += 1,
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(user_id = user.id, error = %e, "Failed to build digest for user");
                }
            }
        }

        tracing::info!(recipients = recipients.len(), created, "Digests built");
        Ok(created)
    }

    async fn digest_for_user(
        &self,
        user: &User,
        today: NaiveDate,
    ) -> Result<Option<Notification>, NotifyError> {
        if !user.email_enabled {
            return Ok(None);
        }
        let city = user.city.trim();
        if city.is_empty() {
            tracing::debug!(user_id = user.id, "Skipping digest for user without a city");
            return Ok(None);
        }
        let frequency = match NotificationFrequency::from_str(&user.frequency) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "Skipping digest for unknown frequency");
                return Ok(None);
            }
        };
        let (Some(window_days), Some(window_start)) =
            (frequency.digest_window_days(), digest_window_start(today, frequency))
        else {
            return Ok(None);
        };

        let since = local_day_start(window_start, self.utc_offset);
        let events = self
            .catalog
            .new_events_in_city(city, since, today, DIGEST_MAX_EVENTS)
            .await?;
        if events.is_empty() {
            return Ok(None);
        }

        let lines: Vec<DigestLine<'_>> = events
            .iter()
            .map(|e| DigestLine {
                title: &e.title,
                start_date: e.start_date,
                address: &e.address,
            })
            .collect();
        let content = digest_content(city, window_days, &lines);

        Ok(self
            .record_and_enqueue(user, None, NotificationKind::NewEvent, content)
            .await)
    }

    // -----------------------------------------------------------------------
    // Event changes
    // -----------------------------------------------------------------------

    /// Tell every user who marked the event that it changed.
    pub async fn notify_event_update(&self, event_id: DbId) -> Result<usize, NotifyError> {
        self.notify_interacting_users(event_id, NotificationKind::EventUpdate)
            .await
    }

    /// Tell every user who marked the event that it was cancelled.
    pub async fn notify_event_cancelled(&self, event_id: DbId) -> Result<usize, NotifyError> {
        self.notify_interacting_users(event_id, NotificationKind::EventCancelled)
            .await
    }

    async fn notify_interacting_users(
        &self,
        event_id: DbId,
        kind: NotificationKind,
    ) -> Result<usize, NotifyError> {
        let event = self
            .catalog
            .find_event(event_id)
            .await?
            .ok_or(NotifyError::NotFound {
                entity: "event",
                id: event_id,
            })?;

        let content = match kind {
            NotificationKind::EventCancelled => cancelled_content(&event.title),
            _ => update_content(&event.title),
        };

        let user_ids = self.catalog.interacting_user_ids(event.id, None).await?;
        let mut created = 0;
        for user_id in user_ids {
            let Some(user) = self.mail_recipient(user_id).await else {
                continue;
            };
            if self
                .record_and_enqueue(&user, Some(event.id), kind, content.clone())
                .await
                .is_some()
            {
                created += 1;
            }
        }

        tracing::info!(event_id, kind = %kind, created, "Event change notifications built");
        Ok(created)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Load a user who should receive mail, or `None` (logged) otherwise.
    async fn mail_recipient(&self, user_id: DbId) -> Option<User> {
        match self.users.find_user(user_id).await {
            Ok(Some(user)) if user.email_enabled => Some(user),
            Ok(Some(_)) => None,
            Ok(None) => {
                tracing::warn!(user_id, "Interaction references a missing user");
                None
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to load user");
                None
            }
        }
    }

    /// Persist one notification and enqueue its delivery.
    ///
    /// Returns `None` (logged) if either step fails.
    async fn record_and_enqueue(
        &self,
        user: &User,
        event_id: Option<DbId>,
        kind: NotificationKind,
        content: NotificationContent,
    ) -> Option<Notification> {
        let input = CreateNotification {
            user_id: user.id,
            event_id,
            kind: kind.as_str().to_string(),
            title: content.title,
            message: content.message,
        };

        let notification = match self.notifications.create_notification(input).await {
            Ok(n) => n,
            Err(e) => {
                tracing::error!(user_id = user.id, ?event_id, error = %e, "Failed to store notification");
                return None;
            }
        };

        let job = Job::SendNotification {
            notification_id: notification.id,
        };
        if let Err(e) = self.queue.enqueue(job).await {
            tracing::error!(notification_id = notification.id, error = %e, "Failed to enqueue delivery");
            return None;
        }

        tracing::debug!(
            notification_id = notification.id,
            user_id = user.id,
            kind = %kind,
            "Notification created"
        );
        Some(notification)
    }
}
