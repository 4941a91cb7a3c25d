//! Data-access seams used by the dispatcher and the delivery sender.
//!
//! The traits are narrow on purpose: each names exactly the reads and writes
//! the notification workflow performs. [`PgStore`] implements all three on
//! top of the repositories.

mod pg;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use cityevents_core::catalog::{EventStatus, InteractionKind};
use cityevents_core::types::DbId;
use cityevents_db::models::event::Event;
use cityevents_db::models::notification::{CreateNotification, Notification};
use cityevents_db::models::user::User;

use crate::error::NotifyError;

pub use pg::PgStore;

/// Read-only view of events and interactions.
#[async_trait]
pub trait EventCatalog: Send + Sync {
    async fn find_event(&self, id: DbId) -> Result<Option<Event>, NotifyError>;

    /// Events with `status` whose start date is `date`.
    async fn events_starting_on(
        &self,
        date: NaiveDate,
        status: EventStatus,
    ) -> Result<Vec<Event>, NotifyError>;

    /// Published events whose city contains `city` (case-insensitive),
    /// created at or after the instant `created_since`, starting on or after
    /// `today`, newest first, at most `limit`.
    async fn new_events_in_city(
        &self,
        city: &str,
        created_since: DateTime<Utc>,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Event>, NotifyError>;

    /// Distinct users with an interaction on the event, optionally of one kind.
    async fn interacting_user_ids(
        &self,
        event_id: DbId,
        kind: Option<InteractionKind>,
    ) -> Result<Vec<DbId>, NotifyError>;
}

/// Read-only view of users and their notification preferences.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, id: DbId) -> Result<Option<User>, NotifyError>;

    /// Users eligible for a digest: email enabled, frequency daily or weekly.
    async fn digest_recipients(&self) -> Result<Vec<User>, NotifyError>;
}

/// Notification rows.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_notification(
        &self,
        input: CreateNotification,
    ) -> Result<Notification, NotifyError>;

    async fn find_notification(&self, id: DbId) -> Result<Option<Notification>, NotifyError>;

    /// Set `is_sent` and `sent_at` if the row is still unsent. Returns
    /// whether this call performed the transition.
    async fn mark_sent(&self, id: DbId) -> Result<bool, NotifyError>;
}
