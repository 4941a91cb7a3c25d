#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use cityevents_api::app::build_app;
use cityevents_api::auth::jwt::JwtConfig;
use cityevents_api::config::ServerConfig;
use cityevents_api::state::AppState;
use cityevents_core::catalog::EventStatus;
use cityevents_db::models::event::{CreateEvent, Event};
use cityevents_db::repositories::EventRepo;
use cityevents_notify::LogMailer;
use cityevents_worker::{Services, WorkerConfig};

/// Build a test `ServerConfig` with safe defaults.
///
/// KudaGo points at a closed local port so import runs fail fast.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        worker: WorkerConfig {
            kudago_base_url: "http://127.0.0.1:9".to_string(),
            ..WorkerConfig::default()
        },
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let services = Services::new(pool.clone(), &config.worker, Arc::new(LogMailer)).unwrap();

    let state = AppState {
        pool,
        config: Arc::new(config),
        runner: services.runner,
        queue: services.queue,
    };
    build_app(state).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(t) => builder.header("authorization", format!("Bearer {t}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, builder("GET", uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, builder("GET", uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, builder("POST", uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = builder("POST", uri, None)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = builder("POST", uri, Some(token))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = builder("PUT", uri, Some(token))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register `username` through the API and return `(access_token, user_id)`.
pub async fn register(app: Router, username: &str, city: &str) -> (String, i64) {
    let body = serde_json::json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "password123",
        "city": city,
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["data"]["access_token"].as_str().unwrap().to_string(),
        json["data"]["user"]["id"].as_i64().unwrap(),
    )
}

/// Register a user, promote it to staff, and log in again for a staff token.
pub async fn register_staff(app: Router, pool: &PgPool, username: &str) -> String {
    let (_, user_id) = register(app.clone(), username, "Москва").await;
    sqlx::query("UPDATE users SET is_staff = true WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();

    let body = serde_json::json!({ "username": username, "password": "password123" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

/// Insert an event directly through the repository.
pub async fn seed_event(
    pool: &PgPool,
    slug: &str,
    city: &str,
    start_date: NaiveDate,
    status: EventStatus,
) -> Event {
    EventRepo::create(
        pool,
        &CreateEvent {
            title: format!("Event {slug}"),
            slug: slug.to_string(),
            description: "Live music".to_string(),
            short_description: String::new(),
            category_id: None,
            start_date,
            start_time: NaiveTime::from_hms_opt(19, 30, 0),
            address: "Тверская, 1".to_string(),
            city: city.to_string(),
            latitude: None,
            longitude: None,
            venue_name: "Club".to_string(),
            organizer: "Organizer".to_string(),
            is_free: false,
            image_url: None,
            status: status.as_str().to_string(),
            source: "manual".to_string(),
            external_id: String::new(),
            created_by: None,
        },
    )
    .await
    .unwrap()
}
