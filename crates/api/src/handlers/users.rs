//! Handlers for `/users/me`.

use std::str::FromStr;

use axum::extract::State;
use axum::Json;
use cityevents_core::error::CoreError;
use cityevents_core::notification::NotificationFrequency;
use cityevents_db::models::user::{UpdateProfile, UserResponse};
use cityevents_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/v1/users/me
///
/// Partial update of city, interests, notification toggles, and digest
/// frequency. Omitted fields are left unchanged.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(frequency) = &input.frequency {
        NotificationFrequency::from_str(frequency)?;
    }
    input.city = input.city.map(|c| c.trim().to_string());

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    tracing::info!(user_id = user.id, frequency = %user.frequency, "Profile updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}
