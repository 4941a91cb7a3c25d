//! Review entity model and DTOs.

use cityevents_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub text: String,
    /// `pending`, `approved`, or `rejected`.
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Approved review joined with the author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewWithAuthor {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub rating: i16,
    pub text: String,
    pub created_at: Timestamp,
}

/// Aggregate rating of an event over approved reviews.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewStats {
    pub average_rating: Option<f64>,
    pub reviews_count: i64,
}
