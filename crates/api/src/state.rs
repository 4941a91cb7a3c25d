use std::sync::Arc;

use cityevents_notify::JobQueue;
use cityevents_worker::JobRunner;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: cityevents_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Runs reminder, digest, and import jobs on demand for staff.
    pub runner: JobRunner,
    /// Queue shared with the worker; update/cancel notices are enqueued here.
    pub queue: Arc<dyn JobQueue>,
}

impl AppState {
    /// Today's date in the configured scheduler zone.
    pub fn today(&self) -> chrono::NaiveDate {
        self.runner.today()
    }
}
