use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use cityevents_importer::DEFAULT_BASE_URL;

/// Default number of concurrent delivery workers.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default idle poll interval of a delivery worker.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Default KudaGo city code.
pub const DEFAULT_IMPORT_CITY: &str = "msk";

/// Default number of listings considered per import run.
pub const DEFAULT_IMPORT_LIMIT: usize = 50;

/// A worker setting that is present but unusable.
#[derive(Debug, thiserror::Error)]
#[error("{name} has an invalid value '{value}'")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub concurrency: usize,
    pub poll_interval: Duration,
    /// Zone the scheduler's wall clock and "today" are computed in.
    pub utc_offset: FixedOffset,
    pub import_city: String,
    pub import_limit: usize,
    pub kudago_base_url: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            utc_offset: Utc.fix(),
            import_city: DEFAULT_IMPORT_CITY.to_string(),
            import_limit: DEFAULT_IMPORT_LIMIT,
            kudago_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl WorkerConfig {
    /// Load configuration from environment variables. Unset values fall back
    /// to their defaults; set but unparsable ones are a [`ConfigError`].
    ///
    /// | Env Var                      | Default                                 |
    /// |------------------------------|-----------------------------------------|
    /// | `WORKER_CONCURRENCY`         | `4`                                     |
    /// | `WORKER_POLL_INTERVAL_MS`    | `1000`                                  |
    /// | `SCHEDULER_UTC_OFFSET_HOURS` | `0`                                     |
    /// | `IMPORT_CITY`                | `msk`                                   |
    /// | `IMPORT_LIMIT`               | `50`                                    |
    /// | `KUDAGO_BASE_URL`            | `https://api.kudago.com/public-api/v1.4`|
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let concurrency = env_parse("WORKER_CONCURRENCY", |n: &usize| *n > 0)?
            .unwrap_or(defaults.concurrency);
        let poll_interval = env_parse("WORKER_POLL_INTERVAL_MS", |_: &u64| true)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);
        let utc_offset = parse_offset(std::env::var("SCHEDULER_UTC_OFFSET_HOURS").ok())?
            .unwrap_or(defaults.utc_offset);
        let import_limit = env_parse("IMPORT_LIMIT", |_: &usize| true)?
            .unwrap_or(defaults.import_limit);

        Ok(Self {
            concurrency,
            poll_interval,
            utc_offset,
            import_city: std::env::var("IMPORT_CITY").unwrap_or(defaults.import_city),
            import_limit,
            kudago_base_url: std::env::var("KUDAGO_BASE_URL").unwrap_or(defaults.kudago_base_url),
        })
    }
}

/// Parse `name` if set, rejecting values that fail to parse or `accept`.
fn env_parse<T: std::str::FromStr>(
    name: &'static str,
    accept: impl Fn(&T) -> bool,
) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => parse_value(name, value, accept).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T: std::str::FromStr>(
    name: &'static str,
    value: String,
    accept: impl Fn(&T) -> bool,
) -> Result<T, ConfigError> {
    match value.trim().parse::<T>() {
        Ok(parsed) if accept(&parsed) => Ok(parsed),
        _ => Err(ConfigError { name, value }),
    }
}

/// `SCHEDULER_UTC_OFFSET_HOURS` as a zone, if set.
fn parse_offset(value: Option<String>) -> Result<Option<FixedOffset>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let hours: i32 = parse_value("SCHEDULER_UTC_OFFSET_HOURS", value.clone(), |_: &i32| true)?;
    offset_from_hours(hours).map(Some).ok_or(ConfigError {
        name: "SCHEDULER_UTC_OFFSET_HOURS",
        value,
    })
}

/// Fixed offset for a whole number of hours, `None` outside `-23..=23`.
pub fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours.checked_mul(3600)?)
}
