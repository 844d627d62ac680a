//! HTTP-level tests for the `/auth` resource: registration, login, and the
//! authenticated `/me` endpoint, through the real extractors and error
//! mapping.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_creates_a_new_user_with_zeroed_stats(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = app
        .oneshot(post_json(
            "/api/v1/auth/register",
            serde_json::json!({
                "name": "Test Speaker",
                "email": "speaker@example.com",
                "password": "Sup3rSecret"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;

    let user = &json["data"]["user"];
    assert_eq!(user["email"], "speaker@example.com");
    assert_eq!(user["total_sessions"], 0);
    assert_eq!(user["is_new_user"], true);
    assert_eq!(user["current_level"], "beginner");
    assert!(json["data"]["access_token"].is_string());
    assert!(json["data"]["refresh_token"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_weak_passwords_and_bad_emails(pool: PgPool) {
    let app = common::build_test_app(pool);

    // No uppercase/digit mix.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/register",
            serde_json::json!({
                "name": "Test Speaker",
                "email": "speaker@example.com",
                "password": "alllowercase"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    // Not an email.
    let response = app
        .oneshot(post_json(
            "/api/v1/auth/register",
            serde_json::json!({
                "name": "Test Speaker",
                "email": "not-an-email",
                "password": "Sup3rSecret"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_registration_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "name": "Test Speaker",
        "email": "speaker@example.com",
        "password": "Sup3rSecret"
    });

    let first = app
        .clone()
        .oneshot(post_json("/api/v1/auth/register", body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_json("/api/v1/auth/register", body))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = json_body(second).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_round_trip_and_me(pool: PgPool) {
    let app = common::build_test_app(pool);

    app.clone()
        .oneshot(post_json(
            "/api/v1/auth/register",
            serde_json::json!({
                "name": "Test Speaker",
                "email": "speaker@example.com",
                "password": "Sup3rSecret"
            }),
        ))
        .await
        .unwrap();

    // Wrong password: 401 with a non-specific message.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/login",
            serde_json::json!({"email": "speaker@example.com", "password": "WrongPass1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct password; email lookup is case-insensitive.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/login",
            serde_json::json!({"email": "Speaker@Example.COM", "password": "Sup3rSecret"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let token = json["data"]["access_token"].as_str().unwrap().to_string();

    // The token works against /me, which includes the seeded level buckets.
    let response = app
        .oneshot(
            Request::get("/api/v1/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["user"]["email"], "speaker@example.com");
    assert_eq!(json["data"]["levels"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_routes_require_a_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = app
        .oneshot(
            Request::get("/api/v1/sessions/recent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}
