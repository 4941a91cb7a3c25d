//! Daily cron triggers for the batch jobs.
//!
//! The [`Scheduler`] owns an explicit list of [`ScheduleEntry`] values and
//! spawns one task per entry on [`Scheduler::start`]. Entries never block
//! each other; a trigger missed while the process was down is skipped.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use cityevents_core::error::CoreError;
use cityevents_core::scheduling::CronSchedule;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::jobs::{JobName, JobTrigger};

/// Default daily schedule: digest 09:00, reminders 10:00, import 02:00.
pub const DEFAULT_SCHEDULE: [(JobName, &str); 3] = [
    (JobName::RunReminders, "0 10 * * *"),
    (JobName::RunDigest, "0 9 * * *"),
    (JobName::RunImport, "0 2 * * *"),
];

/// One job and when it fires.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub job: JobName,
    pub cron: CronSchedule,
}

impl ScheduleEntry {
    pub fn new(job: JobName, expression: &str) -> Result<Self, CoreError> {
        Ok(Self {
            job,
            cron: CronSchedule::parse(expression)?,
        })
    }
}

/// Fires the job of every entry at its cron times.
pub struct Scheduler {
    entries: Vec<ScheduleEntry>,
    utc_offset: FixedOffset,
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(entries: Vec<ScheduleEntry>, utc_offset: FixedOffset) -> Self {
        Self {
            entries,
            utc_offset,
            cancel: CancellationToken::new(),
            handles: Vec::new(),
        }
    }

    /// Scheduler with [`DEFAULT_SCHEDULE`].
    pub fn with_default_schedule(utc_offset: FixedOffset) -> Result<Self, CoreError> {
        let entries = DEFAULT_SCHEDULE
            .iter()
            .map(|(job, expr)| ScheduleEntry::new(*job, expr))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(entries, utc_offset))
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Spawn one trigger loop per entry. Calling `start` twice spawns a
    /// second set of loops.
    pub fn start(&mut self, trigger: Arc<dyn JobTrigger>) {
        for entry in &self.entries {
            tracing::info!(job = %entry.job, cron = entry.cron.expression(), "Scheduling job");
            let handle = tokio::spawn(run_entry(
                entry.clone(),
                self.utc_offset,
                Arc::clone(&trigger),
                self.cancel.clone(),
            ));
            self.handles.push(handle);
        }
    }

    /// Cancel every loop and wait up to `timeout` for them to finish.
    ///
    /// A job already running is awaited up to the same bound; loops still
    /// alive afterwards are aborted.
    pub async fn shutdown(self, timeout: Duration) {
        self.cancel.cancel();
        let abort_handles: Vec<_> = self.handles.iter().map(|h| h.abort_handle()).collect();
        let joined = tokio::time::timeout(timeout, futures::future::join_all(self.handles)).await;
        if joined.is_err() {
            tracing::warn!("Scheduler tasks did not stop in time, aborting");
            for handle in abort_handles {
                handle.abort();
            }
        }
        tracing::info!("Scheduler stopped");
    }
}

/// Next fire time (wall clock in `offset`) strictly after both `now` and
/// `last_fired`, and how long to wait for it.
pub fn next_fire(
    cron: &CronSchedule,
    now: DateTime<Utc>,
    last_fired: Option<NaiveDateTime>,
    offset: FixedOffset,
) -> (NaiveDateTime, Duration) {
    let local_now = now.with_timezone(&offset).naive_local();
    let base = match last_fired {
        Some(last) if last > local_now => last,
        _ => local_now,
    };
    let next = cron.next_after(base);
    let wait = (next - local_now).to_std().unwrap_or(Duration::ZERO);
    (next, wait)
}

async fn run_entry(
    entry: ScheduleEntry,
    offset: FixedOffset,
    trigger: Arc<dyn JobTrigger>,
    cancel: CancellationToken,
) {
    let mut last_fired: Option<NaiveDateTime> = None;

    loop {
        let (fire_at, wait) = next_fire(&entry.cron, Utc::now(), last_fired, offset);
        tracing::debug!(job = %entry.job, next = %fire_at, "Waiting for next trigger");

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(job = %entry.job, "Schedule cancelled");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                last_fired = Some(fire_at);
                match trigger.trigger(entry.job).await {
                    Ok(summary) => {
                        tracing::info!(job = %entry.job, count = summary.count, message = %summary.message, "Scheduled job finished");
                    }
                    Err(e) => {
                        tracing::error!(job = %entry.job, error = %e, "Scheduled job failed");
                    }
                }
            }
        }
    }
}
