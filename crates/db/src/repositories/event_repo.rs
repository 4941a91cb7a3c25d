//! Repository for the `events` table.

use chrono::{DateTime, NaiveDate, Utc};
use cityevents_core::catalog::EventStatus;
use cityevents_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{CreateEvent, Event, EventListQuery};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, slug, description, short_description, category_id, \
    start_date, start_time, end_date, end_time, address, city, latitude, longitude, \
    venue_name, organizer, is_free, price_min, price_max, ticket_url, age_restriction, \
    image_url, status, is_featured, source, external_id, created_by, views_count, \
    created_at, updated_at";

/// Same list qualified with the `e.` alias for joined queries.
const E_COLUMNS: &str = "e.id, e.title, e.slug, e.description, e.short_description, \
    e.category_id, e.start_date, e.start_time, e.end_date, e.end_time, e.address, e.city, \
    e.latitude, e.longitude, e.venue_name, e.organizer, e.is_free, e.price_min, e.price_max, \
    e.ticket_url, e.age_restriction, e.image_url, e.status, e.is_featured, e.source, \
    e.external_id, e.created_by, e.views_count, e.created_at, e.updated_at";

/// Filter clause for published listings. Parameter order:
/// `$1` status, `$2` city, `$3` category slug, `$4` from, `$5` to,
/// `$6` search, `$7` is_free, `$8` is_featured, `$9` earliest start date.
/// `$2` and `$6` are already [`contains_pattern`]s.
const LIST_FILTER: &str = "e.status = $1
      AND ($2::TEXT IS NULL OR e.city ILIKE $2)
      AND ($3::TEXT IS NULL OR c.slug = $3)
      AND ($4::DATE IS NULL OR e.start_date >= $4)
      AND ($5::DATE IS NULL OR e.start_date <= $5)
      AND ($6::TEXT IS NULL
           OR e.title ILIKE $6
           OR e.description ILIKE $6
           OR e.organizer ILIKE $6
           OR e.venue_name ILIKE $6)
      AND ($7::BOOLEAN IS NULL OR e.is_free = $7)
      AND ($8::BOOLEAN IS NULL OR e.is_featured = $8)
      AND ($9::DATE IS NULL OR e.start_date >= $9)";

/// Provides CRUD and catalog queries for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (
                title, slug, description, short_description, category_id,
                start_date, start_time, address, city, latitude, longitude,
                venue_name, organizer, is_free, image_url, status, source,
                external_id, created_by
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.short_description)
            .bind(input.category_id)
            .bind(input.start_date)
            .bind(input.start_time)
            .bind(&input.address)
            .bind(&input.city)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.venue_name)
            .bind(&input.organizer)
            .bind(input.is_free)
            .bind(&input.image_url)
            .bind(&input.status)
            .bind(&input.source)
            .bind(&input.external_id)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find an event by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an event by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE slug = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether any event already uses `slug`.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// Whether an event from `source` with `external_id` was already stored.
    pub async fn exists_external(
        pool: &PgPool,
        source: &str,
        external_id: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM events WHERE source = $1 AND external_id = $2)",
        )
        .bind(source)
        .bind(external_id)
        .fetch_one(pool)
        .await
    }

    /// List published events matching `params`, soonest first.
    ///
    /// Past events are excluded unless `show_past` is set; `today` is the
    /// cut-off date. Returns the page and the total match count.
    pub async fn list_published(
        pool: &PgPool,
        params: &EventListQuery,
        today: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Event>, i64), sqlx::Error> {
        let earliest = if params.show_past { None } else { Some(today) };
        let city = params.city.as_deref().map(contains_pattern);
        let search = params.search.as_deref().map(contains_pattern);

        let query = format!(
            "SELECT {E_COLUMNS} FROM events e
             LEFT JOIN categories c ON c.id = e.category_id
             WHERE {LIST_FILTER}
             ORDER BY e.start_date ASC, e.start_time ASC NULLS LAST, e.id ASC
             LIMIT $10 OFFSET $11"
        );
        let items = sqlx::query_as::<_, Event>(&query)
            .bind(EventStatus::Published.as_str())
            .bind(&city)
            .bind(&params.category)
            .bind(params.start_date_from)
            .bind(params.start_date_to)
            .bind(&search)
            .bind(params.is_free)
            .bind(params.is_featured)
            .bind(earliest)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!(
            "SELECT COUNT(*) FROM events e
             LEFT JOIN categories c ON c.id = e.category_id
             WHERE {LIST_FILTER}"
        );
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(EventStatus::Published.as_str())
            .bind(&city)
            .bind(&params.category)
            .bind(params.start_date_from)
            .bind(params.start_date_to)
            .bind(&search)
            .bind(params.is_free)
            .bind(params.is_featured)
            .bind(earliest)
            .fetch_one(pool)
            .await?;

        Ok((items, total))
    }

    /// Upcoming featured published events.
    pub async fn list_featured(
        pool: &PgPool,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE status = $1 AND is_featured = true AND start_date >= $2
             ORDER BY start_date ASC, id ASC
             LIMIT $3"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(EventStatus::Published.as_str())
            .bind(today)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Bump the view counter of an event.
    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE events SET views_count = views_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Events with `status` starting on `date`, ordered by start time.
    pub async fn list_starting_on(
        pool: &PgPool,
        date: NaiveDate,
        status: EventStatus,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE start_date = $1 AND status = $2
             ORDER BY start_time ASC NULLS LAST, id ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(date)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
    }

    /// Published events whose city contains `city` (case-insensitive),
    /// created at or after the instant `created_since` and not started
    /// before `today`, newest first.
    pub async fn list_new_in_city(
        pool: &PgPool,
        city: &str,
        created_since: DateTime<Utc>,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE city ILIKE $1
               AND status = $2
               AND created_at >= $3
               AND start_date >= $4
             ORDER BY created_at DESC, id DESC
             LIMIT $5"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(contains_pattern(city))
            .bind(EventStatus::Published.as_str())
            .bind(created_since)
            .bind(today)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Published events a user interacted with, optionally limited to one
    /// interaction `kind`, soonest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        kind: Option<&str>,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE status = $3
               AND id IN (
                   SELECT event_id FROM event_interactions
                   WHERE user_id = $1 AND ($2::TEXT IS NULL OR kind = $2)
               )
             ORDER BY start_date ASC, start_time ASC NULLS LAST, id ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .bind(kind)
            .bind(EventStatus::Published.as_str())
            .fetch_all(pool)
            .await
    }

    /// Set the status of an event. Returns `None` if it does not exist.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: EventStatus,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("UPDATE events SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}

/// `ILIKE` pattern matching `needle` anywhere, with `\`, `%` and `_`
/// escaped so they match literally.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
