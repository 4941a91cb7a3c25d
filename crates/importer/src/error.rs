/// Failure while importing external listings.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The listing source could not be fetched or decoded.
    #[error("Listing source error: {0}")]
    Source(String),

    /// A single record could not be mapped onto an event.
    #[error("Invalid record: {0}")]
    Record(String),

    /// Database failure while storing a record.
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl From<reqwest::Error> for ImportError {
    fn from(err: reqwest::Error) -> Self {
        ImportError::Source(err.to_string())
    }
}
