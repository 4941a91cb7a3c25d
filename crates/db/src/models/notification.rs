//! Notification entity model and DTOs.

use cityevents_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// `is_sent` and `sent_at` always agree: a row is sent exactly when
/// `sent_at` is set (enforced by `ck_notifications_sent_at`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: Option<DbId>,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub is_sent: bool,
    pub sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub event_id: Option<DbId>,
    pub kind: String,
    pub title: String,
    pub message: String,
}
