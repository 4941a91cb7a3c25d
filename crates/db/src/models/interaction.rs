//! User/event interaction model.

use cityevents_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `event_interactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Interaction {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: DbId,
    /// `interested` or `going`.
    pub kind: String,
    pub created_at: Timestamp,
}
