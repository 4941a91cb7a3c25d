//! Repository for the `event_interactions` table.

use cityevents_core::types::DbId;
use sqlx::PgPool;

/// Interested/going flags of users on events.
pub struct InteractionRepo;

impl InteractionRepo {
    /// Flip the `kind` interaction of `user_id` on `event_id`.
    ///
    /// Returns `true` if the interaction was added, `false` if removed.
    pub async fn toggle(
        pool: &PgPool,
        user_id: DbId,
        event_id: DbId,
        kind: &str,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query(
            "DELETE FROM event_interactions \
             WHERE user_id = $1 AND event_id = $2 AND kind = $3",
        )
        .bind(user_id)
        .bind(event_id)
        .bind(kind)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if removed == 0 {
            sqlx::query(
                "INSERT INTO event_interactions (user_id, event_id, kind) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT ON CONSTRAINT uq_event_interactions_user_event_kind DO NOTHING",
            )
            .bind(user_id)
            .bind(event_id)
            .bind(kind)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(removed == 0)
    }

    /// Interaction kinds the user has on the event, in name order.
    pub async fn kinds_for_user(
        pool: &PgPool,
        user_id: DbId,
        event_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT kind FROM event_interactions \
             WHERE user_id = $1 AND event_id = $2 \
             ORDER BY kind",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_all(pool)
        .await
    }

    /// Distinct users with an interaction on `event_id`, optionally limited
    /// to one `kind`, in ascending id order.
    pub async fn list_user_ids_for_event(
        pool: &PgPool,
        event_id: DbId,
        kind: Option<&str>,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT user_id FROM event_interactions \
             WHERE event_id = $1 AND ($2::TEXT IS NULL OR kind = $2) \
             ORDER BY user_id",
        )
        .bind(event_id)
        .bind(kind)
        .fetch_all(pool)
        .await
    }
}
