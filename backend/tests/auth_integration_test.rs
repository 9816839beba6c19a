//! Integration tests for the register → verify → login workflow
//!
//! These run against a real Postgres database (TEST_DATABASE_URL) and are
//! ignored otherwise.

mod common;

use axum::http::StatusCode;
use portal_auth_backend::auth::JwtService;
use serde_json::json;

fn register_body(email: &str, password: &str, role: &str) -> String {
    json!({
        "firstName": "A",
        "lastName": "B",
        "email": email,
        "password": password,
        "role": role,
    })
    .to_string()
}

fn login_body(email: &str, password: &str) -> String {
    json!({ "email": email, "password": password }).to_string()
}

fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, uuid::Uuid::new_v4())
}

/// Register and return the verification token from the response body
async fn register(app: &common::TestApp, email: &str, password: &str, role: &str) -> String {
    let (status, response) = app
        .post("/auth/register", &register_body(email, password, role))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["status"], "SUCCESS");
    response["token"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_creates_unverified_user_with_hashed_password() {
    let app = common::TestApp::new().await;
    let email = unique_email("register");

    let token = register(&app, &email, "SecurePassword123!", "staff").await;
    assert!(!token.is_empty());

    let (password_hash, verified): (String, bool) =
        sqlx::query_as("SELECT password_hash, verified FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&app.pool)
            .await
            .unwrap();

    assert!(!verified);
    assert_ne!(password_hash, "SecurePassword123!");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_duplicate_email() {
    let app = common::TestApp::new().await;
    let email = unique_email("duplicate");

    register(&app, &email, "SecurePassword123!", "staff").await;

    // Second registration with same email should fail with 400
    let (status, response) = app
        .post("/auth/register", &register_body(&email, "SecurePassword123!", "staff"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("Email already registered."));

    // Exactly one record persists
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_expired_verification_token_fails_even_for_existing_user() {
    let app = common::TestApp::new().await;
    let email = unique_email("expired");

    register(&app, &email, "SecurePassword123!", "staff").await;

    // Mint an already-expired token with the test secret
    let expired_issuer = JwtService::new(common::TEST_JWT_SECRET, -120, -120);
    let token = expired_issuer.issue_verification_token(&email).unwrap();

    let (status, response) = app.get(&format!("/auth/verify/{}", token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("Invalid or expired verification token."));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_verify_is_idempotent() {
    let app = common::TestApp::new().await;
    let email = unique_email("idempotent");

    let token = register(&app, &email, "SecurePassword123!", "staff").await;

    for _ in 0..2 {
        let (status, response) = app.get(&format!("/auth/verify/{}", token)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(response.contains("Email verified successfully!"));
    }

    let (verified,): (bool,) = sqlx::query_as("SELECT verified FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(verified);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_verify_with_unknown_email_fails() {
    let app = common::TestApp::new().await;

    // Valid token for an email that was never registered
    let issuer = JwtService::new(common::TEST_JWT_SECRET, 3600, 86400);
    let token = issuer
        .issue_verification_token(&unique_email("ghost"))
        .unwrap();

    let (status, response) = app.get(&format!("/auth/verify/{}", token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("Invalid or expired verification token."));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_before_verification_fails() {
    let app = common::TestApp::new().await;
    let email = unique_email("unverified");

    register(&app, &email, "SecurePassword123!", "staff").await;

    let (status, response) = app
        .post("/auth/login", &login_body(&email, "SecurePassword123!"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("Verify your email first"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_customer_role_rejected_even_when_verified() {
    let app = common::TestApp::new().await;
    let email = unique_email("customer");

    let token = register(&app, &email, "SecurePassword123!", "customer").await;
    let (status, _) = app.get(&format!("/auth/verify/{}", token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, response) = app
        .post("/auth/login", &login_body(&email, "SecurePassword123!"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("You are not allowed to login from here"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_unknown_user() {
    let app = common::TestApp::new().await;

    let (status, response) = app
        .post("/auth/login", &login_body(&unique_email("nobody"), "SomePassword123!"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("User not found"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_full_workflow_and_password_never_leaks() {
    let app = common::TestApp::new().await;
    let email = unique_email("walkthrough");

    // register("A","B",email,"pw123","staff") -> 201, token T
    // A short password is fine: registration applies no strength gate
    let token = register(&app, &email, "pw123", "staff").await;

    // verify(T) -> 200
    let (status, _) = app.get(&format!("/auth/verify/{}", token)).await;
    assert_eq!(status, StatusCode::OK);

    // wrong password -> 400 Invalid credentials
    let (status, response) = app
        .post("/auth/login", &login_body(&email, "wrong"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("Invalid credentials"));

    // correct password -> 200 with session token and sanitized user
    let (status, response) = app
        .post("/auth/login", &login_body(&email, "pw123"))
        .await;
    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["status"], "SUCCESS");
    let session_token = response["token"].as_str().unwrap();
    assert!(!session_token.is_empty());

    let user = &response["user"];
    assert_eq!(user["email"], email.as_str());
    assert_eq!(user["role"], "staff");
    assert_eq!(user["verified"], true);
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    // The session token authenticates /auth/me
    let (status, response) = app.get_auth("/auth/me", session_token).await;
    assert_eq!(status, StatusCode::OK);
    let me: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(me["email"], email.as_str());
}
