//! In-memory implementations of the store and transport seams.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use cityevents_core::catalog::{EventStatus, InteractionKind};
use cityevents_core::types::DbId;
use cityevents_db::models::event::Event;
use cityevents_db::models::notification::{CreateNotification, Notification};
use cityevents_db::models::user::User;
use cityevents_notify::{
    EmailError, EventCatalog, MailTransport, NotificationStore, NotifyError, UserDirectory,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn user(id: DbId, city: &str, frequency: &str) -> User {
    let now = Utc::now();
    User {
        id,
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
        password_hash: String::new(),
        city: city.to_string(),
        interests: String::new(),
        is_staff: false,
        is_active: true,
        email_enabled: true,
        push_enabled: false,
        frequency: frequency.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn event(id: DbId, title: &str, start_date: NaiveDate) -> Event {
    let now = Utc::now();
    Event {
        id,
        title: title.to_string(),
        slug: format!("event-{id}"),
        description: String::new(),
        short_description: String::new(),
        category_id: None,
        start_date,
        start_time: NaiveTime::from_hms_opt(19, 30, 0),
        end_date: None,
        end_time: None,
        address: "Тверская, 1".to_string(),
        city: "Москва".to_string(),
        latitude: None,
        longitude: None,
        venue_name: String::new(),
        organizer: String::new(),
        is_free: true,
        price_min: None,
        price_max: None,
        ticket_url: String::new(),
        age_restriction: "0+".to_string(),
        image_url: None,
        status: EventStatus::Published.as_str().to_string(),
        is_featured: false,
        source: "manual".to_string(),
        external_id: String::new(),
        created_by: None,
        views_count: 0,
        created_at: now,
        updated_at: now,
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct State {
    users: Vec<User>,
    events: Vec<Event>,
    interactions: Vec<(DbId, DbId, InteractionKind)>,
    notifications: Vec<Notification>,
    /// Users whose notifications cannot be stored.
    failing_users: Vec<DbId>,
    /// Events whose interactions cannot be loaded.
    failing_events: Vec<DbId>,
}

/// Implements every store seam over plain vectors.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.state.lock().unwrap().users.push(user);
    }

    pub fn add_event(&self, event: Event) {
        self.state.lock().unwrap().events.push(event);
    }

    pub fn add_interaction(&self, user_id: DbId, event_id: DbId, kind: InteractionKind) {
        self.state
            .lock()
            .unwrap()
            .interactions
            .push((user_id, event_id, kind));
    }

    /// Make `create_notification` fail for this user.
    pub fn fail_notifications_for(&self, user_id: DbId) {
        self.state.lock().unwrap().failing_users.push(user_id);
    }

    /// Make `interacting_user_ids` fail for this event.
    pub fn fail_interactions_for(&self, event_id: DbId) {
        self.state.lock().unwrap().failing_events.push(event_id);
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.lock().unwrap().notifications.clone()
    }

    /// Insert a notification directly, bypassing the dispatcher.
    pub fn seed_notification(&self, user_id: DbId, title: &str) -> DbId {
        let mut state = self.state.lock().unwrap();
        let id = state.notifications.len() as DbId + 1;
        state.notifications.push(Notification {
            id,
            user_id,
            event_id: None,
            kind: "event_reminder".to_string(),
            title: title.to_string(),
            message: "message".to_string(),
            is_read: false,
            is_sent: false,
            sent_at: None,
            created_at: Utc::now(),
        });
        id
    }
}

#[async_trait]
impl EventCatalog for MemoryStore {
    async fn find_event(&self, id: DbId) -> Result<Option<Event>, NotifyError> {
        let state = self.state.lock().unwrap();
        Ok(state.events.iter().find(|e| e.id == id).cloned())
    }

    async fn events_starting_on(
        &self,
        date: NaiveDate,
        status: EventStatus,
    ) -> Result<Vec<Event>, NotifyError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .events
            .iter()
            .filter(|e| e.start_date == date && e.status == status.as_str())
            .cloned()
            .collect())
    }

    async fn new_events_in_city(
        &self,
        city: &str,
        created_since: DateTime<Utc>,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Event>, NotifyError> {
        let state = self.state.lock().unwrap();
        let needle = city.to_lowercase();
        let mut events: Vec<Event> = state
            .events
            .iter()
            .filter(|e| {
                e.city.to_lowercase().contains(&needle)
                    && e.status == EventStatus::Published.as_str()
                    && e.created_at >= created_since
                    && e.start_date >= today
            })
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        events.truncate(limit as usize);
        Ok(events)
    }

    async fn interacting_user_ids(
        &self,
        event_id: DbId,
        kind: Option<InteractionKind>,
    ) -> Result<Vec<DbId>, NotifyError> {
        let state = self.state.lock().unwrap();
        if state.failing_events.contains(&event_id) {
            return Err(NotifyError::Store(format!("interactions of event {event_id} unavailable")));
        }
        let mut ids: Vec<DbId> = state
            .interactions
            .iter()
            .filter(|(_, e, k)| *e == event_id && kind.map_or(true, |want| want == *k))
            .map(|(u, _, _)| *u)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_user(&self, id: DbId) -> Result<Option<User>, NotifyError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn digest_recipients(&self) -> Result<Vec<User>, NotifyError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .filter(|u| u.email_enabled && (u.frequency == "daily" || u.frequency == "weekly"))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_notification(
        &self,
        input: CreateNotification,
    ) -> Result<Notification, NotifyError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_users.contains(&input.user_id) {
            return Err(NotifyError::Store(format!("insert for user {} rejected", input.user_id)));
        }
        let notification = Notification {
            id: state.notifications.len() as DbId + 1,
            user_id: input.user_id,
            event_id: input.event_id,
            kind: input.kind,
            title: input.title,
            message: input.message,
            is_read: false,
            is_sent: false,
            sent_at: None,
            created_at: Utc::now(),
        };
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn find_notification(&self, id: DbId) -> Result<Option<Notification>, NotifyError> {
        let state = self.state.lock().unwrap();
        Ok(state.notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn mark_sent(&self, id: DbId) -> Result<bool, NotifyError> {
        let mut state = self.state.lock().unwrap();
        match state.notifications.iter_mut().find(|n| n.id == id && !n.is_sent) {
            Some(n) => {
                n.is_sent = true;
                n.sent_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingMailer
// ---------------------------------------------------------------------------

/// Records every message; optionally fails all sends.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String, String)>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send_mail(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::Build("connection refused".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}
