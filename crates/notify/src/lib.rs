//! Notification dispatch and delivery.
//!
//! - [`Dispatcher`] decides who gets notified, persists the notification
//!   rows, and enqueues one delivery job per row.
//! - [`DeliverySender`] performs the mail transport for a single
//!   notification and marks it sent.
//! - [`JobQueue`] is the only channel between the two; [`JobExecutor`]
//!   runs whatever a worker claims from it.
//! - [`store`] holds the data-access seams and their PostgreSQL
//!   implementation.

pub mod delivery;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod queue;
pub mod sender;
pub mod store;

pub use delivery::email::{EmailConfig, EmailError, SmtpMailer};
pub use delivery::{mailer_from_env, LogMailer, MailTransport};
pub use dispatcher::Dispatcher;
pub use error::NotifyError;
pub use executor::JobExecutor;
pub use queue::{ClaimedJob, Job, JobQueue, MemoryQueue, PgJobQueue};
pub use sender::{DeliverySender, SendOutcome};
pub use store::{EventCatalog, NotificationStore, PgStore, UserDirectory};
