//! Work-queue job model.

use cityevents_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Job waiting to be claimed.
pub const JOB_STATUS_PENDING: &str = "pending";
/// Job claimed by a worker.
pub const JOB_STATUS_RUNNING: &str = "running";
/// Job finished successfully.
pub const JOB_STATUS_COMPLETED: &str = "completed";
/// Job finished with an error; never retried automatically.
pub const JOB_STATUS_FAILED: &str = "failed";

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub job_type: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub attempts: i32,
    pub error_message: Option<String>,
    pub enqueued_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
}
