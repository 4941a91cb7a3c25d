//! Raw listing records and the source seam.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ImportError;

/// One listing as returned by the external API. Every field is optional
/// on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawListing {
    pub id: Option<serde_json::Value>,
    pub title: Option<String>,
    pub short_title: Option<String>,
    pub description: Option<String>,
    pub dates: Vec<RawDate>,
    pub price: Option<String>,
    pub images: Vec<RawImage>,
    pub place: Option<RawPlace>,
    /// Category slugs. Non-string entries are ignored.
    pub categories: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDate {
    /// Unix timestamp in seconds.
    pub start: Option<i64>,
    pub end: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawImage {
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPlace {
    pub location: Option<String>,
    pub address: Option<String>,
    pub title: Option<String>,
    pub coords: Option<RawCoords>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCoords {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl RawListing {
    /// The external id as text. Numeric and string ids are both accepted.
    pub fn external_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Fetches the current listings for a city.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listings(&self, city_code: &str) -> Result<Vec<RawListing>, ImportError>;
}
