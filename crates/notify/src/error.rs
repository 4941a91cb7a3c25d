use cityevents_core::types::DbId;

use crate::delivery::email::EmailError;

/// Failure of a dispatch or delivery step.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The event or notification vanished between scheduling and execution.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The mail transport refused or failed the message.
    #[error("Mail transport error: {0}")]
    Transport(#[from] EmailError),

    /// Database or queue failure.
    #[error("Store error: {0}")]
    Store(String),

    /// A queued job payload could not be encoded or decoded.
    #[error("Invalid job: {0}")]
    InvalidJob(String),
}

impl From<sqlx::Error> for NotifyError {
    fn from(err: sqlx::Error) -> Self {
        NotifyError::Store(err.to_string())
    }
}
