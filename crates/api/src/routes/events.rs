//! Route definitions for the `/events` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{events, reviews};
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// Static segments (`featured`, `mine`) take precedence over `{slug}`.
///
/// ```text
/// GET    /                          -> list_events
/// GET    /featured                  -> list_featured
/// GET    /mine                      -> my_events
/// GET    /{slug}                    -> get_event
/// POST   /{slug}/interested         -> toggle_interested
/// POST   /{slug}/going              -> toggle_going
/// GET    /{slug}/reviews            -> list_reviews
/// POST   /{slug}/reviews            -> create_review
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events))
        .route("/featured", get(events::list_featured))
        .route("/mine", get(events::my_events))
        .route("/{slug}", get(events::get_event))
        .route("/{slug}/interested", post(events::toggle_interested))
        .route("/{slug}/going", post(events::toggle_going))
        .route(
            "/{slug}/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
}
