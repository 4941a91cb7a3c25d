//! HTTP tests for events, interactions, categories, and reviews.

mod common;

use axum::http::StatusCode;
use cityevents_core::catalog::{EventStatus, ReviewStatus};
use cityevents_db::repositories::{CategoryRepo, ReviewRepo};
use common::{
    body_json, build_test_app, days_from_today, get, get_auth, post_auth, post_json_auth,
    register, seed_event,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_shows_upcoming_published_only(pool: PgPool) {
    seed_event(&pool, "later", "Москва", days_from_today(5), EventStatus::Published).await;
    seed_event(&pool, "sooner", "Москва", days_from_today(1), EventStatus::Published).await;
    seed_event(&pool, "past", "Москва", days_from_today(-3), EventStatus::Published).await;
    seed_event(&pool, "draft", "Москва", days_from_today(2), EventStatus::Draft).await;
    let app = build_test_app(pool);

    let json = body_json(get(app.clone(), "/api/v1/events").await).await;
    let slugs: Vec<&str> = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["sooner", "later"]);
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["limit"], 20);

    let with_past = body_json(get(app, "/api/v1/events?show_past=true").await).await;
    assert_eq!(with_past["data"]["total"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_city_substring(pool: PgPool) {
    seed_event(&pool, "msk", "Москва", days_from_today(1), EventStatus::Published).await;
    seed_event(&pool, "spb", "Санкт-Петербург", days_from_today(1), EventStatus::Published).await;
    let app = build_test_app(pool);

    let json = body_json(get(app, "/api/v1/events?city=%D0%9F%D0%B5%D1%82%D0%B5%D1%80").await).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["slug"], "spb");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn featured_is_not_taken_for_a_slug(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/events/featured").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn categories_are_listed(pool: PgPool) {
    CategoryRepo::get_or_create(&pool, "concert", "Concert").await.unwrap();
    let app = build_test_app(pool);

    let json = body_json(get(app, "/api/v1/categories").await).await;
    assert_eq!(json["data"][0]["slug"], "concert");
}

// ---------------------------------------------------------------------------
// Detail and interactions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_counts_views_and_hides_drafts(pool: PgPool) {
    seed_event(&pool, "jazz", "Москва", days_from_today(1), EventStatus::Published).await;
    seed_event(&pool, "draft", "Москва", days_from_today(1), EventStatus::Draft).await;
    let app = build_test_app(pool);

    get(app.clone(), "/api/v1/events/jazz").await;
    let json = body_json(get(app.clone(), "/api/v1/events/jazz").await).await;
    assert_eq!(json["data"]["views_count"], 2);
    assert_eq!(json["data"]["average_rating"], 0.0);
    assert_eq!(json["data"]["reviews_count"], 0);
    assert_eq!(json["data"]["user_interaction"], json!([]));

    let draft = get(app, "/api/v1/events/draft").await;
    assert_eq!(draft.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn going_toggles_on_and_off(pool: PgPool) {
    seed_event(&pool, "jazz", "Москва", days_from_today(1), EventStatus::Published).await;
    let app = build_test_app(pool);
    let (token, _) = register(app.clone(), "anna", "Москва").await;

    let added = post_auth(app.clone(), "/api/v1/events/jazz/going", &token).await;
    assert_eq!(added.status(), StatusCode::CREATED);
    assert_eq!(body_json(added).await["data"]["status"], "added");

    let detail = body_json(get_auth(app.clone(), "/api/v1/events/jazz", &token).await).await;
    assert_eq!(detail["data"]["user_interaction"], json!(["going"]));

    let mine = body_json(get_auth(app.clone(), "/api/v1/events/mine?type=going", &token).await).await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);

    let removed = post_auth(app.clone(), "/api/v1/events/jazz/going", &token).await;
    assert_eq!(removed.status(), StatusCode::OK);
    assert_eq!(body_json(removed).await["data"]["status"], "removed");

    let mine = body_json(get_auth(app, "/api/v1/events/mine", &token).await).await;
    assert_eq!(mine["data"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn interactions_require_auth_and_valid_type(pool: PgPool) {
    seed_event(&pool, "jazz", "Москва", days_from_today(1), EventStatus::Published).await;
    let app = build_test_app(pool);
    let (token, _) = register(app.clone(), "anna", "Москва").await;

    let anonymous = common::post_json(app.clone(), "/api/v1/events/jazz/interested", json!({})).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let bad_type = get_auth(app.clone(), "/api/v1/events/mine?type=maybe", &token).await;
    assert_eq!(bad_type.status(), StatusCode::BAD_REQUEST);

    let missing = post_auth(app, "/api/v1/events/nope/interested", &token).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reviews_are_moderated_before_listing(pool: PgPool) {
    seed_event(&pool, "jazz", "Москва", days_from_today(1), EventStatus::Published).await;
    let app = build_test_app(pool.clone());
    let (token, _) = register(app.clone(), "anna", "Москва").await;

    let created = post_json_auth(
        app.clone(),
        "/api/v1/events/jazz/reviews",
        json!({ "rating": 4, "text": "Great" }),
        &token,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let review = body_json(created).await;
    assert_eq!(review["data"]["status"], "pending");

    let listed = body_json(get(app.clone(), "/api/v1/events/jazz/reviews").await).await;
    assert_eq!(listed["data"], json!([]));

    let review_id = review["data"]["id"].as_i64().unwrap();
    ReviewRepo::set_status(&pool, review_id, ReviewStatus::Approved)
        .await
        .unwrap();

    let listed = body_json(get(app.clone(), "/api/v1/events/jazz/reviews").await).await;
    assert_eq!(listed["data"][0]["username"], "anna");

    let detail = body_json(get(app, "/api/v1/events/jazz").await).await;
    assert_eq!(detail["data"]["average_rating"], 4.0);
    assert_eq!(detail["data"]["reviews_count"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_review_and_bad_rating_are_rejected(pool: PgPool) {
    seed_event(&pool, "jazz", "Москва", days_from_today(1), EventStatus::Published).await;
    let app = build_test_app(pool);
    let (token, _) = register(app.clone(), "anna", "Москва").await;

    let out_of_range = post_json_auth(
        app.clone(),
        "/api/v1/events/jazz/reviews",
        json!({ "rating": 6 }),
        &token,
    )
    .await;
    assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);

    let first = post_json_auth(
        app.clone(),
        "/api/v1/events/jazz/reviews",
        json!({ "rating": 5 }),
        &token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(
        app,
        "/api/v1/events/jazz/reviews",
        json!({ "rating": 3 }),
        &token,
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}
