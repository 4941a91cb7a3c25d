//! HTTP client for the KudaGo public events API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::error::ImportError;
use crate::source::{ListingSource, RawListing};

/// Public API root.
pub const DEFAULT_BASE_URL: &str = "https://api.kudago.com/public-api/v1.4";

/// Fields requested for every listing.
const LISTING_FIELDS: &str = "id,title,short_title,description,dates,price,images,place,categories";

/// One page is all a run imports.
const PAGE_SIZE: u32 = 100;

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ListingPage {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// Fetches upcoming events from KudaGo.
pub struct KudaGoClient {
    client: reqwest::Client,
    base_url: String,
}

impl KudaGoClient {
    /// Create a client for `base_url` (without a trailing slash).
    pub fn new(base_url: String) -> Result<Self, ImportError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base_url })
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

/// Decode each record independently so one malformed entry does not sink
/// the page.
fn decode_records(results: Vec<serde_json::Value>) -> Vec<RawListing> {
    results
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawListing>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable listing");
                None
            }
        })
        .collect()
}

#[async_trait]
impl ListingSource for KudaGoClient {
    async fn fetch_listings(&self, city_code: &str) -> Result<Vec<RawListing>, ImportError> {
        let actual_since = Utc::now().timestamp().to_string();
        let page_size = PAGE_SIZE.to_string();

        let response = self
            .client
            .get(format!("{}/events/", self.base_url.trim_end_matches('/')))
            .query(&[
                ("location", city_code),
                ("fields", LISTING_FIELDS),
                ("expand", "place,images"),
                ("actual_since", actual_since.as_str()),
                ("page_size", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::Source(format!("KudaGo returned HTTP {}", status.as_u16())));
        }

        let page: ListingPage = response.json().await?;
        let records = decode_records(page.results);
        tracing::debug!(city = city_code, count = records.len(), "Fetched KudaGo listings");
        Ok(records)
    }
}
