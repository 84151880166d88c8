mod common;

use auth::Hasher;
use auth::JwtHandler;
use common::TestApp;
use common::TEST_ACCESS_SECRET;
use common::TEST_REFRESH_SECRET;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_returns_token_pair() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .json(&json!({
            "fullName": "Alice Example",
            "email": "alice@example.com",
            "password": "Abc12345!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["isSuccess"], true);
    assert!(!body["data"]["accessToken"].as_str().unwrap().is_empty());
    assert!(!body["data"]["refreshToken"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email_is_rejected_case_insensitively() {
    let app = TestApp::spawn().await;

    app.register_ok("Alice Example", "alice@example.com", "Abc12345!", None)
        .await;

    // Same address, different casing
    let response = app
        .post("/auth/register")
        .json(&json!({
            "fullName": "Alice Imposter",
            "email": "Alice@Example.COM",
            "password": "Abc12345!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["isSuccess"], false);
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_register_reports_all_invalid_fields() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .json(&json!({
            "fullName": "   ",
            "email": "not-an-email",
            "password": "short",
            "role": "superuser"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["isSuccess"], false);
    assert_eq!(body["message"], "Validation failed");
    for field in ["fullName", "email", "password", "role"] {
        assert!(
            body["errors"][field].is_array(),
            "expected error entry for {}",
            field
        );
    }
}

#[tokio::test]
async fn test_register_login_refresh_replay_flow() {
    let app = TestApp::spawn().await;

    // Register
    let response = app
        .post("/auth/register")
        .json(&json!({
            "fullName": "A Example",
            "email": "a@x.com",
            "password": "Abc12345!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    // Wrong password
    let response = app
        .post("/auth/login")
        .json(&json!({ "email": "a@x.com", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct password
    let (_, refresh_token) = app.login_ok("a@x.com", "Abc12345!").await;

    // First refresh succeeds and rotates
    let response = app
        .post_authenticated("/auth/refresh", &refresh_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let rotated = body["data"]["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh_token);

    // Replay of the superseded token is rejected
    let response = app
        .post_authenticated("/auth/refresh", &refresh_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The rotated token still works
    let response = app
        .post_authenticated("/auth/refresh", &rotated)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_share_a_generic_message() {
    let app = TestApp::spawn().await;

    app.register_ok("Alice Example", "alice@example.com", "Abc12345!", None)
        .await;

    let unknown = app
        .post("/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "Abc12345!" }))
        .send()
        .await
        .expect("Failed to execute request");
    let wrong = app
        .post("/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "Abc12345?" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let unknown_body: serde_json::Value = unknown.json().await.unwrap();
    let wrong_body: serde_json::Value = wrong.json().await.unwrap();
    // Enumeration resistance: identical messages for both failure causes
    assert_eq!(unknown_body["message"], wrong_body["message"]);
}

#[tokio::test]
async fn test_login_soft_deleted_account_fails_with_correct_password() {
    use chrono::Utc;
    use identity_service::domain::user::ports::UserRepository;

    let app = TestApp::spawn().await;

    app.register_ok("Alice Example", "alice@example.com", "Abc12345!", None)
        .await;

    let user = app
        .users
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .expect("user should exist");
    app.users.soft_delete(&user.id, Utc::now()).await.unwrap();

    let response = app
        .post("/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "Abc12345!" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_logout_kills_the_refresh_path() {
    let app = TestApp::spawn().await;

    let (access_token, refresh_token) = app
        .register_ok("Alice Example", "alice@example.com", "Abc12345!", None)
        .await;

    let response = app
        .post_authenticated("/auth/logout", &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    // The refresh token was still signature-valid, but its digest is gone
    let response = app
        .post_authenticated("/auth/refresh", &refresh_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Logging out twice is not an error
    let response = app
        .post_authenticated("/auth/logout", &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_second_login_invalidates_first_session() {
    let app = TestApp::spawn().await;

    app.register_ok("Alice Example", "alice@example.com", "Abc12345!", None)
        .await;

    let (_, first_refresh) = app.login_ok("alice@example.com", "Abc12345!").await;
    let (_, second_refresh) = app.login_ok("alice@example.com", "Abc12345!").await;

    // Only one digest is stored per user, so the earlier session lost
    let response = app
        .post_authenticated("/auth/refresh", &first_refresh)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post_authenticated("/auth/refresh", &second_refresh)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_persisted_digest_matches_returned_refresh_token() {
    use identity_service::domain::user::ports::UserRepository;

    let app = TestApp::spawn().await;

    let (_, refresh_token) = app
        .register_ok("Alice Example", "alice@example.com", "Abc12345!", None)
        .await;

    let user = app
        .users
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .expect("user should exist");
    let digest = user
        .refresh_token_hash
        .expect("a digest must be persisted at issuance");

    let hasher = Hasher::new();
    assert!(hasher.verify(&refresh_token, &digest).unwrap());
    assert!(!hasher.verify("some-other-token", &digest).unwrap());
}

#[tokio::test]
async fn test_token_claim_shapes() {
    let app = TestApp::spawn().await;

    let (access_token, refresh_token) = app
        .register_ok("Alice Example", "alice@example.com", "Abc12345!", Some("admin"))
        .await;

    let access_claims: serde_json::Value = JwtHandler::new(TEST_ACCESS_SECRET.as_bytes())
        .decode(&access_token)
        .expect("access token must verify against the access secret");
    assert!(access_claims["sub"].is_string());
    assert_eq!(access_claims["email"], "alice@example.com");
    assert_eq!(access_claims["role"], "admin");

    let refresh_claims: serde_json::Value = JwtHandler::new(TEST_REFRESH_SECRET.as_bytes())
        .decode(&refresh_token)
        .expect("refresh token must verify against the refresh secret");
    assert_eq!(refresh_claims["sub"], access_claims["sub"]);
    // Minimal claims: no role or email in the refresh token
    assert!(refresh_claims.get("email").is_none());
    assert!(refresh_claims.get("role").is_none());
}

#[tokio::test]
async fn test_access_token_is_rejected_by_the_refresh_guard() {
    let app = TestApp::spawn().await;

    let (access_token, refresh_token) = app
        .register_ok("Alice Example", "alice@example.com", "Abc12345!", None)
        .await;

    // Wrong token kind on each guard
    let response = app
        .post_authenticated("/auth/refresh", &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post_authenticated("/auth/logout", &refresh_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_without_bearer_header() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/refresh")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["isSuccess"], false);
}
