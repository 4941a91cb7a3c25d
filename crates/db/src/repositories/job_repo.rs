//! Repository for the `jobs` work queue.

use cityevents_core::types::DbId;
use sqlx::PgPool;

use crate::models::job::{
    Job, JOB_STATUS_COMPLETED, JOB_STATUS_FAILED, JOB_STATUS_PENDING, JOB_STATUS_RUNNING,
};

/// Column list for `jobs` queries.
const COLUMNS: &str = "id, job_type, payload, status, attempts, error_message, \
                       enqueued_at, claimed_at, finished_at";

/// Queue operations over the `jobs` table.
pub struct JobRepo;

impl JobRepo {
    /// Append a pending job.
    pub async fn enqueue(
        pool: &PgPool,
        job_type: &str,
        payload: &serde_json::Value,
    ) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (job_type, payload, status) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(job_type)
            .bind(payload)
            .bind(JOB_STATUS_PENDING)
            .fetch_one(pool)
            .await
    }

    /// Atomically claim the oldest pending job.
    ///
    /// Uses `SELECT FOR UPDATE SKIP LOCKED` so concurrent workers never
    /// claim the same row.
    pub async fn claim_next(pool: &PgPool) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs \
             SET status = $1, claimed_at = NOW(), attempts = attempts + 1 \
             WHERE id = ( \
                 SELECT id FROM jobs \
                 WHERE status = $2 \
                 ORDER BY enqueued_at ASC, id ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(JOB_STATUS_RUNNING)
            .bind(JOB_STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// Mark a claimed job as completed.
    pub async fn complete(pool: &PgPool, job_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET status = $2, finished_at = NOW() WHERE id = $1")
            .bind(job_id)
            .bind(JOB_STATUS_COMPLETED)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a claimed job as failed. No automatic retry is performed.
    pub async fn fail(pool: &PgPool, job_id: DbId, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET status = $2, error_message = $3, finished_at = NOW() WHERE id = $1",
        )
        .bind(job_id)
        .bind(JOB_STATUS_FAILED)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Count jobs in the given status.
    pub async fn count_by_status(pool: &PgPool, status: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE status = $1")
            .bind(status)
            .fetch_one(pool)
            .await
    }
}
