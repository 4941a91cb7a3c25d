//! Event catalog vocabulary: event lifecycle, user interactions, review
//! moderation, and import source names.

use crate::error::CoreError;

define_text_enum! {
    /// Event lifecycle status.
    EventStatus {
        Draft = "draft",
        Published = "published",
        Cancelled = "cancelled",
        Completed = "completed",
    }
}

define_text_enum! {
    /// A user's declared relationship to an event.
    InteractionKind {
        Interested = "interested",
        Going = "going",
    }
}

define_text_enum! {
    /// Review moderation status.
    ReviewStatus {
        Pending = "pending",
        Approved = "approved",
        Rejected = "rejected",
    }
}

/// `events.source` value for events created through the API.
pub const SOURCE_MANUAL: &str = "manual";

/// `events.source` value for events imported from KudaGo.
pub const SOURCE_KUDAGO: &str = "kudago";

/// Organizer label stamped on imported events.
pub const IMPORTED_ORGANIZER: &str = "Импорт из KudaGo";

/// Allowed `events.age_restriction` values.
pub const AGE_RESTRICTIONS: &[&str] = &["0+", "6+", "12+", "16+", "18+"];

/// Lowest accepted review rating.
pub const MIN_RATING: i16 = 1;

/// Highest accepted review rating.
pub const MAX_RATING: i16 = 5;

/// Validate a review rating (`1..=5`).
pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

/// Round an average rating to one decimal place, treating "no reviews" as 0.
pub fn round_average_rating(avg: Option<f64>) -> f64 {
    match avg {
        Some(v) => (v * 10.0).round() / 10.0,
        None => 0.0,
    }
}
