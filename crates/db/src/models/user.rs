//! User entity model and DTOs.

use cityevents_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub city: String,
    pub interests: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub email_enabled: bool,
    pub push_enabled: bool,
    /// One of `daily`, `weekly`, `instant`.
    pub frequency: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Comma-separated interests split into trimmed, non-empty entries.
    pub fn interests_list(&self) -> Vec<String> {
        self.interests
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub city: String,
    pub interests: Vec<String>,
    pub is_staff: bool,
    pub email_enabled: bool,
    pub push_enabled: bool,
    pub frequency: String,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            city: user.city.clone(),
            interests: user.interests_list(),
            is_staff: user.is_staff,
            email_enabled: user.email_enabled,
            push_enabled: user.push_enabled,
            frequency: user.frequency.clone(),
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub city: String,
}

/// DTO for a profile update. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub city: Option<String>,
    pub interests: Option<String>,
    pub email_enabled: Option<bool>,
    pub push_enabled: Option<bool>,
    pub frequency: Option<String>,
}
