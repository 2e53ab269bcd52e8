// tests/api_auth.rs

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn register_creates_user_without_exposing_the_hash() {
    let app = TestApp::new();

    let res = app
        .post_json(
            "/api/auth/register",
            None,
            json!({ "email": "founder@startup.com", "password": "s3cretpass", "name": "Ada" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    let body = res.json();
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["email"], "founder@startup.com");
    assert_eq!(body["user"]["name"], "Ada");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn register_requires_email_and_password() {
    let app = TestApp::new();

    for payload in [json!({ "email": "a@b.com" }), json!({ "password": "s3cretpass" }), json!({ "email": "", "password": "" })] {
        let res = app.post_json("/api/auth/register", None, payload).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.json()["error"], "Email and password are required");
    }
}

#[tokio::test]
async fn register_rejects_duplicates_and_bad_emails() {
    let app = TestApp::new();
    let payload = json!({ "email": "dup@startup.com", "password": "s3cretpass" });

    assert_eq!(app.post_json("/api/auth/register", None, payload.clone()).await.status, StatusCode::CREATED);

    let res = app.post_json("/api/auth/register", None, payload).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["error"], "User with this email already exists");

    let res = app
        .post_json("/api/auth/register", None, json!({ "email": "not-an-email", "password": "s3cretpass" }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["details"]["email"].is_array());
}

#[tokio::test]
async fn login_then_session_round_trip() {
    let app = TestApp::new();
    app.signed_in_user("ada@startup.com").await;

    let res = app
        .post_json("/api/auth/login", None, json!({ "email": "ada@startup.com", "password": "correct-horse" }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["email"], "ada@startup.com");

    let res = app.get("/api/auth/session", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    let session = res.json();
    assert_eq!(session["user"]["email"], "ada@startup.com");
    assert_eq!(session["expires"], body["expires"]);
}

#[tokio::test]
async fn login_failures() {
    let app = TestApp::new();
    app.signed_in_user("ada@startup.com").await;

    let res = app
        .post_json("/api/auth/login", None, json!({ "email": "ada@startup.com", "password": "wrong" }))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json()["error"], "Invalid email or password");

    let res = app
        .post_json("/api/auth/login", None, json!({ "email": "ghost@startup.com", "password": "whatever" }))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.post_json("/api/auth/login", None, json!({ "email": "ada@startup.com" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_require_a_valid_bearer_token() {
    let app = TestApp::new();

    let res = app.get("/api/auth/session", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json()["error"], "Unauthorized");

    let res = app.get("/api/dashboard", Some("not-a-jwt")).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.post_json("/api/generate/proposal", None, json!({ "clientName": "Jane" })).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(app.generator.seen().is_empty());
}

#[tokio::test]
async fn issued_expiry_matches_the_token_exp() {
    let app = TestApp::new();
    let (_, user_id) = app.signed_in_user("ada@startup.com").await;

    let issued = app.state.auth_service.create_token(user_id).unwrap();
    let (_, expires) = app.state.auth_service.validate_token(&issued.token).await.unwrap();

    assert_eq!(issued.expires, expires);
    assert_eq!(issued.expires.timestamp_subsec_nanos(), 0);
}
