//! Route definitions for `/admin`. Every handler requires the staff role.

use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /jobs/reminders                 -> run_reminders
/// POST   /jobs/digest                    -> run_digest
/// POST   /jobs/import                    -> run_import
/// POST   /events/{id}/notify-update      -> notify_update
/// POST   /events/{id}/notify-cancelled   -> notify_cancelled
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs/reminders", post(admin::run_reminders))
        .route("/jobs/digest", post(admin::run_digest))
        .route("/jobs/import", post(admin::run_import))
        .route("/events/{id}/notify-update", post(admin::notify_update))
        .route("/events/{id}/notify-cancelled", post(admin::notify_cancelled))
}
