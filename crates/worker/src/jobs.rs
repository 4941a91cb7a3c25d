//! The named batch jobs: reminders, digest, and import.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, Utc};
use cityevents_importer::Importer;
use cityevents_notify::{Dispatcher, NotifyError};
use serde::Serialize;

/// Names of the schedulable jobs (also the CLI subcommand names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobName {
    RunReminders,
    RunDigest,
    RunImport,
}

impl JobName {
    pub const ALL: [JobName; 3] = [JobName::RunReminders, JobName::RunDigest, JobName::RunImport];

    pub fn as_str(self) -> &'static str {
        match self {
            JobName::RunReminders => "run-reminders",
            JobName::RunDigest => "run-digest",
            JobName::RunImport => "run-import",
        }
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobName::ALL
            .into_iter()
            .find(|j| j.as_str() == s)
            .ok_or_else(|| format!("Unknown job '{s}'"))
    }
}

/// Result of one job run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub job: JobName,
    pub message: String,
    pub count: usize,
}

/// Something that can run a named job on demand.
#[async_trait]
pub trait JobTrigger: Send + Sync {
    async fn trigger(&self, job: JobName) -> Result<JobSummary, NotifyError>;
}

/// Runs jobs against the dispatcher and importer.
#[derive(Clone)]
pub struct JobRunner {
    dispatcher: Dispatcher,
    importer: Importer,
    utc_offset: FixedOffset,
    import_city: String,
    import_limit: usize,
}

impl JobRunner {
    pub fn new(
        dispatcher: Dispatcher,
        importer: Importer,
        utc_offset: FixedOffset,
        import_city: String,
        import_limit: usize,
    ) -> Self {
        Self {
            dispatcher,
            importer,
            utc_offset,
            import_city,
            import_limit,
        }
    }

    /// Today's date in the configured zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset).date_naive()
    }

    pub async fn run_reminders(&self) -> Result<JobSummary, NotifyError> {
        let count = self.dispatcher.build_reminders(self.today()).await?;
        Ok(JobSummary {
            job: JobName::RunReminders,
            message: format!("Отправлено {count} напоминаний"),
            count,
        })
    }

    pub async fn run_digest(&self) -> Result<JobSummary, NotifyError> {
        let count = self.dispatcher.build_digest(self.today()).await?;
        Ok(JobSummary {
            job: JobName::RunDigest,
            message: format!("Отправлено {count} дайджестов"),
            count,
        })
    }

    /// Import listings for `city` (default `IMPORT_CITY`), considering at
    /// most `limit` records (default `IMPORT_LIMIT`).
    pub async fn run_import(&self, city: Option<&str>, limit: Option<usize>) -> JobSummary {
        let city = city.unwrap_or(&self.import_city);
        let limit = limit.unwrap_or(self.import_limit);
        let count = self.importer.import_external_events(city, limit).await;
        JobSummary {
            job: JobName::RunImport,
            message: format!("Импортировано событий: {count}"),
            count,
        }
    }
}

#[async_trait]
impl JobTrigger for JobRunner {
    async fn trigger(&self, job: JobName) -> Result<JobSummary, NotifyError> {
        match job {
            JobName::RunReminders => self.run_reminders().await,
            JobName::RunDigest => self.run_digest().await,
            JobName::RunImport => Ok(self.run_import(None, None).await),
        }
    }
}
