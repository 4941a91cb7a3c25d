//! Background side of the city events backend.
//!
//! - [`jobs`]: the three named batch jobs and their [`JobSummary`].
//! - [`scheduler`]: fires those jobs on daily cron triggers.
//! - [`delivery`]: pool of workers draining the job queue.
//! - [`config`] / [`services`]: wiring from environment to running parts.

pub mod config;
pub mod delivery;
pub mod jobs;
pub mod scheduler;
pub mod services;

pub use config::{ConfigError, WorkerConfig};
pub use delivery::{DeliveryWorkers, JobHandler};
pub use jobs::{JobName, JobRunner, JobSummary, JobTrigger};
pub use scheduler::{ScheduleEntry, Scheduler};
pub use services::Services;
