//! Repository for the `reviews` table.

use cityevents_core::catalog::ReviewStatus;
use cityevents_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{Review, ReviewStats, ReviewWithAuthor};

/// Column list for `reviews` queries.
const COLUMNS: &str = "id, event_id, user_id, rating, text, status, created_at, updated_at";

/// Provides review creation and read-side aggregates.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a pending review.
    ///
    /// A second review by the same user on the same event violates
    /// `uq_reviews_event_user`.
    pub async fn create(
        pool: &PgPool,
        event_id: DbId,
        user_id: DbId,
        rating: i16,
        text: &str,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (event_id, user_id, rating, text, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(event_id)
            .bind(user_id)
            .bind(rating)
            .bind(text)
            .bind(ReviewStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Approved reviews of an event with author names, newest first.
    pub async fn list_approved_for_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithAuthor>(
            "SELECT r.id, r.event_id, r.user_id, u.username, r.rating, r.text, r.created_at
             FROM reviews r
             JOIN users u ON u.id = r.user_id
             WHERE r.event_id = $1 AND r.status = $2
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .bind(event_id)
        .bind(ReviewStatus::Approved.as_str())
        .fetch_all(pool)
        .await
    }

    /// Average rating and count over approved reviews.
    pub async fn stats_for_event(pool: &PgPool, event_id: DbId) -> Result<ReviewStats, sqlx::Error> {
        sqlx::query_as::<_, ReviewStats>(
            "SELECT AVG(rating)::DOUBLE PRECISION AS average_rating,
                    COUNT(*) AS reviews_count
             FROM reviews
             WHERE event_id = $1 AND status = $2",
        )
        .bind(event_id)
        .bind(ReviewStatus::Approved.as_str())
        .fetch_one(pool)
        .await
    }

    /// Set the moderation status of a review.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ReviewStatus,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("UPDATE reviews SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}
