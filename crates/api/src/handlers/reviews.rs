//! Handlers for `/events/{slug}/reviews`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cityevents_core::catalog::validate_rating;
use cityevents_db::models::review::{Review, ReviewWithAuthor};
use cityevents_db::repositories::ReviewRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::events::find_published;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /events/{slug}/reviews`.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i16,
    #[serde(default)]
    pub text: String,
}

/// GET /api/v1/events/{slug}/reviews
///
/// Approved reviews only, newest first.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<ReviewWithAuthor>>>> {
    let event = find_published(&state, &slug).await?;
    let reviews = ReviewRepo::list_approved_for_event(&state.pool, event.id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// POST /api/v1/events/{slug}/reviews
///
/// One review per user per event (a second attempt is 409). New reviews
/// wait for moderation.
pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Review>>)> {
    validate_rating(input.rating)?;
    let event = find_published(&state, &slug).await?;

    let review =
        ReviewRepo::create(&state.pool, event.id, auth.user_id, input.rating, input.text.trim())
            .await?;

    tracing::info!(user_id = auth.user_id, event_id = event.id, review_id = review.id, "Review submitted");
    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}
