//! Event entity model, insert DTO, and list filters.

use chrono::{NaiveDate, NaiveTime};
use cityevents_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub category_id: Option<DbId>,
    pub start_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub address: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub venue_name: String,
    pub organizer: String,
    pub is_free: bool,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub ticket_url: String,
    pub age_restriction: String,
    pub image_url: Option<String>,
    /// One of `draft`, `published`, `cancelled`, `completed`.
    pub status: String,
    pub is_featured: bool,
    pub source: String,
    pub external_id: String,
    pub created_by: Option<DbId>,
    pub views_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an event (API creation and external import).
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub category_id: Option<DbId>,
    pub start_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub address: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub venue_name: String,
    pub organizer: String,
    pub is_free: bool,
    pub image_url: Option<String>,
    pub status: String,
    pub source: String,
    pub external_id: String,
    pub created_by: Option<DbId>,
}

/// Query parameters for listing published events (`GET /events`).
#[derive(Debug, Default, Deserialize)]
pub struct EventListQuery {
    /// Case-insensitive substring of the event city.
    pub city: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    pub start_date_from: Option<NaiveDate>,
    pub start_date_to: Option<NaiveDate>,
    /// Case-insensitive match on title, description, organizer, or venue.
    pub search: Option<String>,
    pub is_free: Option<bool>,
    pub is_featured: Option<bool>,
    /// Include events that already started. Defaults to `false`.
    #[serde(default)]
    pub show_past: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A page of events plus the total number of matches.
#[derive(Debug, Serialize)]
pub struct EventPage {
    pub items: Vec<Event>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
