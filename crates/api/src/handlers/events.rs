//! Handlers for the `/events` and `/categories` resources.
//!
//! Only published events are visible. Interaction toggles and the
//! personal event list require authentication.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cityevents_core::catalog::{round_average_rating, EventStatus, InteractionKind};
use cityevents_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use cityevents_db::models::category::Category;
use cityevents_db::models::event::{Event, EventListQuery, EventPage};
use cityevents_db::repositories::{CategoryRepo, EventRepo, InteractionRepo, ReviewRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of events returned by `GET /events/featured`.
const FEATURED_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Event with its rating summary and the caller's interactions.
#[derive(Debug, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    /// Mean approved rating rounded to one decimal, `0.0` without reviews.
    pub average_rating: f64,
    pub reviews_count: i64,
    /// `interested` / `going` kinds the caller has set; empty for anonymous
    /// requests.
    pub user_interaction: Vec<String>,
}

/// Outcome of an interaction toggle.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// `added` or `removed`.
    pub status: &'static str,
}

/// Query parameters for `GET /events/mine`.
#[derive(Debug, Deserialize)]
pub struct MyEventsParams {
    /// `interested`, `going`, or `all` (default).
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<EventListQuery>,
) -> AppResult<Json<DataResponse<EventPage>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);

    let (items, total) =
        EventRepo::list_published(&state.pool, &params, state.today(), limit, offset).await?;

    Ok(Json(DataResponse {
        data: EventPage {
            items,
            total,
            limit,
            offset,
        },
    }))
}

/// GET /api/v1/events/featured
pub async fn list_featured(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = EventRepo::list_featured(&state.pool, state.today(), FEATURED_LIMIT).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{slug}
///
/// Counts a view on every call.
pub async fn get_event(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<EventDetail>>> {
    let mut event = find_published(&state, &slug).await?;

    EventRepo::increment_views(&state.pool, event.id).await?;
    event.views_count += 1;

    let stats = ReviewRepo::stats_for_event(&state.pool, event.id).await?;
    let user_interaction = match auth {
        Some(user) => InteractionRepo::kinds_for_user(&state.pool, user.user_id, event.id).await?,
        None => Vec::new(),
    };

    Ok(Json(DataResponse {
        data: EventDetail {
            event,
            average_rating: round_average_rating(stats.average_rating),
            reviews_count: stats.reviews_count,
            user_interaction,
        },
    }))
}

/// POST /api/v1/events/{slug}/interested
pub async fn toggle_interested(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<(StatusCode, Json<DataResponse<ToggleResponse>>)> {
    toggle(&state, &auth, &slug, InteractionKind::Interested).await
}

/// POST /api/v1/events/{slug}/going
pub async fn toggle_going(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<(StatusCode, Json<DataResponse<ToggleResponse>>)> {
    toggle(&state, &auth, &slug, InteractionKind::Going).await
}

/// GET /api/v1/events/mine?type=interested|going|all
pub async fn my_events(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MyEventsParams>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let kind = match params.kind.as_deref() {
        None | Some("all") => None,
        Some(other) => Some(InteractionKind::from_str(other)?),
    };

    let events =
        EventRepo::list_for_user(&state.pool, auth.user_id, kind.map(InteractionKind::as_str))
            .await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Look up a published event by slug; anything else is 404.
pub(crate) async fn find_published(state: &AppState, slug: &str) -> AppResult<Event> {
    EventRepo::find_by_slug(&state.pool, slug)
        .await?
        .filter(|e| e.status == EventStatus::Published.as_str())
        .ok_or_else(|| AppError::NotFound(format!("Event '{slug}' not found")))
}

async fn toggle(
    state: &AppState,
    auth: &AuthUser,
    slug: &str,
    kind: InteractionKind,
) -> AppResult<(StatusCode, Json<DataResponse<ToggleResponse>>)> {
    let event = find_published(state, slug).await?;
    let added = InteractionRepo::toggle(&state.pool, auth.user_id, event.id, kind.as_str()).await?;

    tracing::debug!(user_id = auth.user_id, event_id = event.id, %kind, added, "Interaction toggled");

    let (status, label) = if added {
        (StatusCode::CREATED, "added")
    } else {
        (StatusCode::OK, "removed")
    };
    Ok((status, Json(DataResponse { data: ToggleResponse { status: label } })))
}
