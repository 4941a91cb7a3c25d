//! Work queue between the dispatcher (producer) and delivery workers
//! (consumers).

use std::collections::VecDeque;

use async_trait::async_trait;
use cityevents_core::types::DbId;
use cityevents_db::repositories::JobRepo;
use cityevents_db::DbPool;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::NotifyError;

/// A unit of queued work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "job_type", content = "payload", rename_all = "snake_case")]
pub enum Job {
    /// Deliver one stored notification.
    SendNotification { notification_id: DbId },
    /// Fan out `event_update` notifications for an event.
    NotifyEventUpdate { event_id: DbId },
    /// Fan out `event_cancelled` notifications for an event.
    NotifyEventCancelled { event_id: DbId },
}

impl Job {
    /// Split into the `jobs.job_type` / `jobs.payload` column values.
    pub fn to_parts(&self) -> Result<(String, serde_json::Value), NotifyError> {
        let value = serde_json::to_value(self).map_err(|e| NotifyError::InvalidJob(e.to_string()))?;
        let job_type = value
            .get("job_type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| NotifyError::InvalidJob("missing job_type".to_string()))?
            .to_string();
        let payload = value.get("payload").cloned().unwrap_or(serde_json::Value::Null);
        Ok((job_type, payload))
    }

    /// Rebuild a job from its stored columns.
    pub fn from_parts(job_type: &str, payload: serde_json::Value) -> Result<Self, NotifyError> {
        serde_json::from_value(serde_json::json!({ "job_type": job_type, "payload": payload }))
            .map_err(|e| NotifyError::InvalidJob(format!("{job_type}: {e}")))
    }
}

/// A job handed to a worker, with the queue's handle for acknowledging it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedJob {
    pub id: DbId,
    pub job: Job,
}

/// FIFO queue of [`Job`]s with explicit acknowledgement.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: Job) -> Result<(), NotifyError>;

    /// Claim the next job, or `None` if the queue is empty.
    async fn dequeue(&self) -> Result<Option<ClaimedJob>, NotifyError>;

    async fn complete(&self, id: DbId) -> Result<(), NotifyError>;

    /// Record a failure. Failed jobs are not retried.
    async fn fail(&self, id: DbId, error: &str) -> Result<(), NotifyError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL queue
// ---------------------------------------------------------------------------

/// Queue backed by the `jobs` table; safe for many concurrent consumers.
#[derive(Clone)]
pub struct PgJobQueue {
    pool: DbPool,
}

impl PgJobQueue {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobQueue for PgJobQueue {
    async fn enqueue(&self, job: Job) -> Result<(), NotifyError> {
        let (job_type, payload) = job.to_parts()?;
        let row = JobRepo::enqueue(&self.pool, &job_type, &payload).await?;
        tracing::debug!(job_id = row.id, job_type = %row.job_type, "Job enqueued");
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<ClaimedJob>, NotifyError> {
        loop {
            let Some(row) = JobRepo::claim_next(&self.pool).await? else {
                return Ok(None);
            };
            match Job::from_parts(&row.job_type, row.payload) {
                Ok(job) => return Ok(Some(ClaimedJob { id: row.id, job })),
                Err(e) => {
                    tracing::warn!(job_id = row.id, error = %e, "Discarding undecodable job");
                    JobRepo::fail(&self.pool, row.id, &e.to_string()).await?;
                }
            }
        }
    }

    async fn complete(&self, id: DbId) -> Result<(), NotifyError> {
        Ok(JobRepo::complete(&self.pool, id).await?)
    }

    async fn fail(&self, id: DbId, error: &str) -> Result<(), NotifyError> {
        Ok(JobRepo::fail(&self.pool, id, error).await?)
    }
}

// ---------------------------------------------------------------------------
// In-memory queue
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryQueueState {
    next_id: DbId,
    pending: VecDeque<ClaimedJob>,
    completed: Vec<DbId>,
    failed: Vec<(DbId, String)>,
}

/// In-process queue for single-process runs and tests.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    state: Mutex<MemoryQueueState>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs still waiting to be claimed, in order.
    pub async fn pending(&self) -> Vec<Job> {
        let state = self.state.lock().await;
        state.pending.iter().map(|c| c.job.clone()).collect()
    }

    pub async fn completed_count(&self) -> usize {
        self.state.lock().await.completed.len()
    }

    pub async fn failed(&self) -> Vec<(DbId, String)> {
        self.state.lock().await.failed.clone()
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn enqueue(&self, job: Job) -> Result<(), NotifyError> {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = state.next_id;
        state.pending.push_back(ClaimedJob { id, job });
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<ClaimedJob>, NotifyError> {
        Ok(self.state.lock().await.pending.pop_front())
    }

    async fn complete(&self, id: DbId) -> Result<(), NotifyError> {
        self.state.lock().await.completed.push(id);
        Ok(())
    }

    async fn fail(&self, id: DbId, error: &str) -> Result<(), NotifyError> {
        self.state.lock().await.failed.push((id, error.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn job_splits_into_type_and_payload() {
        let (job_type, payload) = Job::SendNotification { notification_id: 7 }
            .to_parts()
            .unwrap();
        assert_eq!(job_type, "send_notification");
        assert_eq!(payload, serde_json::json!({ "notification_id": 7 }));
    }

    #[test]
    fn job_is_rebuilt_from_columns() {
        let job = Job::from_parts("notify_event_cancelled", serde_json::json!({ "event_id": 3 }))
            .unwrap();
        assert_eq!(job, Job::NotifyEventCancelled { event_id: 3 });
    }

    #[test]
    fn unknown_job_type_is_rejected() {
        let result = Job::from_parts("launch_rockets", serde_json::json!({}));
        assert_matches!(result, Err(NotifyError::InvalidJob(_)));
    }

    #[tokio::test]
    async fn memory_queue_is_fifo() {
        let queue = MemoryQueue::new();
        queue.enqueue(Job::SendNotification { notification_id: 1 }).await.unwrap();
        queue.enqueue(Job::SendNotification { notification_id: 2 }).await.unwrap();

        let first = queue.dequeue().await.unwrap().unwrap();
        assert_eq!(first.job, Job::SendNotification { notification_id: 1 });
        queue.complete(first.id).await.unwrap();

        let second = queue.dequeue().await.unwrap().unwrap();
        queue.fail(second.id, "smtp down").await.unwrap();

        assert!(queue.dequeue().await.unwrap().is_none());
        assert_eq!(queue.completed_count().await, 1);
        assert_eq!(queue.failed().await, vec![(second.id, "smtp down".to_string())]);
    }
}
