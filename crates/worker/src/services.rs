//! Builds the dispatcher, importer, runner, and worker pool from a pool.

use std::sync::Arc;

use cityevents_db::DbPool;
use cityevents_importer::{ImportError, Importer, KudaGoClient, PgImportCatalog};
use cityevents_notify::{
    DeliverySender, Dispatcher, JobExecutor, JobQueue, MailTransport, PgJobQueue, PgStore,
};

use crate::config::WorkerConfig;
use crate::delivery::DeliveryWorkers;
use crate::jobs::JobRunner;

/// The wired-up background services.
#[derive(Clone)]
pub struct Services {
    pub dispatcher: Dispatcher,
    pub queue: Arc<dyn JobQueue>,
    pub runner: JobRunner,
    pub workers: DeliveryWorkers,
}

impl Services {
    /// Wire PostgreSQL-backed stores, the `jobs` queue, and the KudaGo client.
    pub fn new(
        pool: DbPool,
        config: &WorkerConfig,
        mailer: Arc<dyn MailTransport>,
    ) -> Result<Self, ImportError> {
        let store = Arc::new(PgStore::new(pool.clone()));
        let queue: Arc<dyn JobQueue> = Arc::new(PgJobQueue::new(pool.clone()));

        let dispatcher = Dispatcher::new(store.clone(), store.clone(), store.clone(), queue.clone())
            .with_utc_offset(config.utc_offset);
        let sender = DeliverySender::new(store.clone(), store, mailer);
        let executor = JobExecutor::new(dispatcher.clone(), sender);

        let source = Arc::new(KudaGoClient::new(config.kudago_base_url.clone())?);
        let catalog = Arc::new(PgImportCatalog::new(pool));
        let importer = Importer::new(source, catalog, config.utc_offset);

        let runner = JobRunner::new(
            dispatcher.clone(),
            importer,
            config.utc_offset,
            config.import_city.clone(),
            config.import_limit,
        );
        let workers = DeliveryWorkers::new(
            queue.clone(),
            Arc::new(executor),
            config.concurrency,
            config.poll_interval,
        );

        Ok(Self {
            dispatcher,
            queue,
            runner,
            workers,
        })
    }
}
