//! Pool of delivery workers draining the job queue.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cityevents_notify::{ClaimedJob, Job, JobExecutor, JobQueue, NotifyError};
use tokio_util::sync::CancellationToken;

/// Executes one claimed job.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &Job) -> Result<(), NotifyError>;
}

#[async_trait]
impl JobHandler for JobExecutor {
    async fn handle(&self, job: &Job) -> Result<(), NotifyError> {
        self.execute(job).await
    }
}

/// N workers claiming jobs from a shared queue.
#[derive(Clone)]
pub struct DeliveryWorkers {
    queue: Arc<dyn JobQueue>,
    handler: Arc<dyn JobHandler>,
    concurrency: usize,
    poll_interval: Duration,
}

impl DeliveryWorkers {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        handler: Arc<dyn JobHandler>,
        concurrency: usize,
        poll_interval: Duration,
    ) -> Self {
        Self {
            queue,
            handler,
            concurrency: concurrency.max(1),
            poll_interval,
        }
    }

    /// Run all workers until `cancel` fires. A job in progress is finished
    /// before its worker exits.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(concurrency = self.concurrency, "Delivery workers started");
        let workers = (0..self.concurrency).map(|id| self.worker_loop(id, cancel.clone()));
        futures::future::join_all(workers).await;
        tracing::info!("Delivery workers stopped");
    }

    /// Process queued jobs on the current task until the queue is empty.
    ///
    /// Returns the number of jobs that completed successfully.
    pub async fn drain(&self) -> Result<usize, NotifyError> {
        let mut succeeded = 0;
        while let Some(claimed) = self.queue.dequeue().await? {
            if self.process(0, claimed).await {
                succeeded += 1;
            }
        }
        Ok(succeeded)
    }

    async fn worker_loop(&self, worker_id: usize, cancel: CancellationToken) {
        loop {
            if cancel.is_cancelled() {
                break;
            }

            match self.queue.dequeue().await {
                Ok(Some(claimed)) => {
                    self.process(worker_id, claimed).await;
                }
                Ok(None) => {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.poll_interval) => {}
                    }
                }
                Err(e) => {
                    tracing::error!(worker_id, error = %e, "Failed to claim job");
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.poll_interval) => {}
                    }
                }
            }
        }
        tracing::debug!(worker_id, "Delivery worker exiting");
    }

    /// Run one job and acknowledge it. Returns whether it succeeded.
    async fn process(&self, worker_id: usize, claimed: ClaimedJob) -> bool {
        let result = self.handler.handle(&claimed.job).await;
        let ack = match &result {
            Ok(()) => self.queue.complete(claimed.id).await,
            Err(e) => {
                tracing::warn!(worker_id, job_id = claimed.id, job = ?claimed.job, error = %e, "Job failed");
                self.queue.fail(claimed.id, &e.to_string()).await
            }
        };
        if let Err(e) = ack {
            tracing::error!(worker_id, job_id = claimed.id, error = %e, "Failed to acknowledge job");
        }
        result.is_ok()
    }
}
