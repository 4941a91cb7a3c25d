//! Repository for the `categories` table.

use sqlx::PgPool;

use crate::models::category::Category;

/// Column list for `categories` queries.
const COLUMNS: &str = "id, name, slug, description, icon, created_at, updated_at";

/// Provides read and get-or-create operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Find a category by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Return the category with `slug`, creating it with `name` if missing.
    ///
    /// The insert is a no-op on a concurrent slug conflict; the follow-up
    /// select then returns the winner's row.
    pub async fn get_or_create(
        pool: &PgPool,
        slug: &str,
        name: &str,
    ) -> Result<Category, sqlx::Error> {
        sqlx::query(
            "INSERT INTO categories (name, slug) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(name)
        .bind(slug)
        .execute(pool)
        .await?;

        Self::find_by_slug(pool, slug)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}
