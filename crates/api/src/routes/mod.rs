pub mod admin;
pub mod auth;
pub mod events;
pub mod health;
pub mod notifications;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
///
/// /events                                          list published (public)
/// /events/featured                                 featured (public)
/// /events/mine                                     caller's events
/// /events/{slug}                                   detail (public)
/// /events/{slug}/interested                        toggle (POST)
/// /events/{slug}/going                             toggle (POST)
/// /events/{slug}/reviews                           list (public), create
///
/// /categories                                      list (public)
///
/// /notifications                                   list
/// /notifications/unread-count                      unread count
/// /notifications/read-all                          mark all read (POST)
/// /notifications/{id}/read                         mark read (POST)
///
/// /users/me                                        get, update (PUT)
///
/// /admin/jobs/{reminders,digest,import}            run job now (staff)
/// /admin/events/{id}/notify-update                 queue update notice (staff)
/// /admin/events/{id}/notify-cancelled              cancel + queue notice (staff)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/events", events::router())
        .route("/categories", get(handlers::events::list_categories))
        .nest("/notifications", notifications::router())
        .nest("/users", users::router())
        .nest("/admin", admin::router())
}
