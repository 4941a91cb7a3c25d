//! Write side of the import.

use async_trait::async_trait;
use cityevents_core::types::DbId;
use cityevents_db::models::event::CreateEvent;
use cityevents_db::repositories::{CategoryRepo, EventRepo};
use cityevents_db::DbPool;

use crate::error::ImportError;

/// Catalog operations the importer needs.
#[async_trait]
pub trait ImportCatalog: Send + Sync {
    /// Whether an event from `source` with `external_id` is already stored.
    async fn exists_external(&self, source: &str, external_id: &str) -> Result<bool, ImportError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, ImportError>;

    /// Category id for `slug`, creating it with `name` if missing.
    async fn get_or_create_category(&self, slug: &str, name: &str) -> Result<DbId, ImportError>;

    async fn create_event(&self, input: CreateEvent) -> Result<DbId, ImportError>;
}

/// [`ImportCatalog`] over PostgreSQL.
#[derive(Clone)]
pub struct PgImportCatalog {
    pool: DbPool,
}

impl PgImportCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportCatalog for PgImportCatalog {
    async fn exists_external(&self, source: &str, external_id: &str) -> Result<bool, ImportError> {
        Ok(EventRepo::exists_external(&self.pool, source, external_id).await?)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, ImportError> {
        Ok(EventRepo::slug_exists(&self.pool, slug).await?)
    }

    async fn get_or_create_category(&self, slug: &str, name: &str) -> Result<DbId, ImportError> {
        Ok(CategoryRepo::get_or_create(&self.pool, slug, name).await?.id)
    }

    async fn create_event(&self, input: CreateEvent) -> Result<DbId, ImportError> {
        Ok(EventRepo::create(&self.pool, &input).await?.id)
    }
}
