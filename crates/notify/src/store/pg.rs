use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use cityevents_core::catalog::{EventStatus, InteractionKind};
use cityevents_core::types::DbId;
use cityevents_db::models::event::Event;
use cityevents_db::models::notification::{CreateNotification, Notification};
use cityevents_db::models::user::User;
use cityevents_db::repositories::{EventRepo, InteractionRepo, NotificationRepo, UserRepo};
use cityevents_db::DbPool;

use super::{EventCatalog, NotificationStore, UserDirectory};
use crate::error::NotifyError;

/// PostgreSQL-backed implementation of every store seam.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventCatalog for PgStore {
    async fn find_event(&self, id: DbId) -> Result<Option<Event>, NotifyError> {
        Ok(EventRepo::find_by_id(&self.pool, id).await?)
    }

    async fn events_starting_on(
        &self,
        date: NaiveDate,
        status: EventStatus,
    ) -> Result<Vec<Event>, NotifyError> {
        Ok(EventRepo::list_starting_on(&self.pool, date, status).await?)
    }

    async fn new_events_in_city(
        &self,
        city: &str,
        created_since: DateTime<Utc>,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Event>, NotifyError> {
        Ok(EventRepo::list_new_in_city(&self.pool, city, created_since, today, limit).await?)
    }

    async fn interacting_user_ids(
        &self,
        event_id: DbId,
        kind: Option<InteractionKind>,
    ) -> Result<Vec<DbId>, NotifyError> {
        let kind = kind.map(|k| k.as_str());
        Ok(InteractionRepo::list_user_ids_for_event(&self.pool, event_id, kind).await?)
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn find_user(&self, id: DbId) -> Result<Option<User>, NotifyError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn digest_recipients(&self) -> Result<Vec<User>, NotifyError> {
        Ok(UserRepo::list_digest_recipients(&self.pool).await?)
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn create_notification(
        &self,
        input: CreateNotification,
    ) -> Result<Notification, NotifyError> {
        Ok(NotificationRepo::create(&self.pool, &input).await?)
    }

    async fn find_notification(&self, id: DbId) -> Result<Option<Notification>, NotifyError> {
        Ok(NotificationRepo::find_by_id(&self.pool, id).await?)
    }

    async fn mark_sent(&self, id: DbId) -> Result<bool, NotifyError> {
        Ok(NotificationRepo::mark_sent(&self.pool, id).await?)
    }
}
