//! Mapping of raw listings onto catalog events.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use cityevents_core::catalog::{EventStatus, IMPORTED_ORGANIZER, SOURCE_KUDAGO};
use cityevents_core::slug::{generate_slug, slug_candidate};
use cityevents_db::models::event::CreateEvent;

use crate::catalog::ImportCatalog;
use crate::error::ImportError;
use crate::source::{ListingSource, RawListing};

/// Category used when a listing has none.
pub const FALLBACK_CATEGORY_SLUG: &str = "other";
pub const FALLBACK_CATEGORY_NAME: &str = "Прочее";

/// City stored when a listing has no place location.
pub const DEFAULT_CITY: &str = "Москва";

/// Title stored when a listing has none.
pub const UNTITLED: &str = "Без названия";

/// Price text the source uses for free events.
const FREE_PRICE: &str = "бесплатно";

/// Maximum stored length of the short description, in characters.
const SHORT_DESCRIPTION_MAX: usize = 300;

/// Give up on a record after this many slug collisions.
const MAX_SLUG_ATTEMPTS: u32 = 1000;

/// Pulls listings from a [`ListingSource`] into an [`ImportCatalog`].
#[derive(Clone)]
pub struct Importer {
    source: Arc<dyn ListingSource>,
    catalog: Arc<dyn ImportCatalog>,
    utc_offset: FixedOffset,
}

impl Importer {
    /// `utc_offset` is the zone listing timestamps are converted into.
    pub fn new(
        source: Arc<dyn ListingSource>,
        catalog: Arc<dyn ImportCatalog>,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            source,
            catalog,
            utc_offset,
        }
    }

    /// Import at most `limit` listings for `city_code`.
    ///
    /// Returns the number of events created. A failed fetch imports nothing;
    /// a failing record is logged and skipped.
    pub async fn import_external_events(&self, city_code: &str, limit: usize) -> usize {
        let listings = match self.source.fetch_listings(city_code).await {
            Ok(listings) => listings,
            Err(e) => {
                tracing::error!(city = city_code, error = %e, "Failed to fetch listings");
                return 0;
            }
        };

        let mut imported = 0;
        for record in listings.iter().take(limit) {
            match self.import_record(record).await {
                Ok(true) => imported += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(external_id = ?record.external_id(), error = %e, "Skipping listing");
                }
            }
        }

        tracing::info!(city = city_code, fetched = listings.len(), imported, "Import finished");
        imported
    }

    /// Store one record. `Ok(false)` means it was skipped on purpose.
    async fn import_record(&self, record: &RawListing) -> Result<bool, ImportError> {
        let external_id = record
            .external_id()
            .ok_or_else(|| ImportError::Record("listing has no id".to_string()))?;

        if self
            .catalog
            .exists_external(SOURCE_KUDAGO, &external_id)
            .await?
        {
            tracing::debug!(external_id, "Listing already imported");
            return Ok(false);
        }

        let Some((start_date, start_time)) = start_of(record, self.utc_offset) else {
            tracing::debug!(external_id, "Listing has no start date");
            return Ok(false);
        };

        let (category_slug, category_name) = category_of(record);
        let category_id = self
            .catalog
            .get_or_create_category(&category_slug, &category_name)
            .await?;

        let title = record
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());
        let slug = self.unique_slug(&title).await?;

        let place = record.place.clone().unwrap_or_default();
        let coords = place.coords.unwrap_or_default();

        let input = CreateEvent {
            slug,
            description: record.description.clone().unwrap_or_default(),
            short_description: record
                .short_title
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(SHORT_DESCRIPTION_MAX)
                .collect(),
            category_id: Some(category_id),
            start_date,
            start_time: Some(start_time),
            address: place.address.unwrap_or_default(),
            city: place
                .location
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CITY.to_string()),
            latitude: coords.lat,
            longitude: coords.lon,
            venue_name: place.title.unwrap_or_default(),
            organizer: IMPORTED_ORGANIZER.to_string(),
            is_free: is_free_price(record.price.as_deref()),
            image_url: record.images.first().and_then(|i| i.image.clone()),
            status: EventStatus::Published.as_str().to_string(),
            source: SOURCE_KUDAGO.to_string(),
            external_id,
            created_by: None,
            title,
        };

        let id = self.catalog.create_event(input).await?;
        tracing::debug!(event_id = id, "Imported listing");
        Ok(true)
    }

    /// First free slug among `base`, `base-1`, `base-2`, ...
    async fn unique_slug(&self, title: &str) -> Result<String, ImportError> {
        let base = generate_slug(title);
        for attempt in 0..MAX_SLUG_ATTEMPTS {
            let candidate = slug_candidate(&base, attempt);
            if !self.catalog.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(ImportError::Record(format!("no free slug for '{base}'")))
    }
}

/// Start date and time of the first `dates[]` entry, in `offset`.
pub fn start_of(record: &RawListing, offset: FixedOffset) -> Option<(NaiveDate, NaiveTime)> {
    let start = record.dates.first()?.start?;
    let local = DateTime::from_timestamp(start, 0)?.with_timezone(&offset);
    Some((local.date_naive(), local.time()))
}

/// Category slug and display name for a record.
pub fn category_of(record: &RawListing) -> (String, String) {
    match record.categories.first() {
        None => (
            FALLBACK_CATEGORY_SLUG.to_string(),
            FALLBACK_CATEGORY_NAME.to_string(),
        ),
        Some(value) => {
            let slug = value
                .as_str()
                .filter(|s| !s.is_empty())
                .unwrap_or(FALLBACK_CATEGORY_SLUG)
                .to_string();
            let name = title_case(&slug.replace('-', " "));
            (slug, name)
        }
    }
}

/// Empty or "бесплатно" (any case) prices mean free.
pub fn is_free_price(price: Option<&str>) -> bool {
    match price.map(str::trim) {
        None | Some("") => true,
        Some(p) => p.to_lowercase() == FREE_PRICE,
    }
}

/// Uppercase the first letter of every word, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
