//! Authentication API integration tests
//!
//! Black-box tests for registration, login, logout, token transport,
//! and the authentication/authorization gates, run against a server
//! backed by the in-memory user store.

mod common;

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use jsonwebtoken::{encode, EncodingKey, Header};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use authgate::auth::sessions::{Claims, TokenKeys, DEFAULT_TOKEN_TTL, SESSION_COOKIE};
use authgate::auth::users::{Role, User};

use common::{auth_header, login_token, register_user, test_server, TEST_SECRET};

fn verifier() -> TokenKeys {
    TokenKeys::new(TEST_SECRET, DEFAULT_TOKEN_TTL)
}

#[tokio::test]
async fn test_register_success_issues_no_token() {
    let server = test_server();

    let response = server
        .post("/auth/register")
        .json(&serde_json::json!({
            "username": "alice",
            "password": "p@ss"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Registration successful");
    assert!(body.get("token").is_none());
    assert!(response.maybe_cookie(SESSION_COOKIE).is_none());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let server = test_server();
    register_user(&server, "alice", "p@ss", None).await;

    let response = server
        .post("/auth/register")
        .json(&serde_json::json!({
            "username": "alice",
            "password": "another"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn test_register_missing_fields() {
    let server = test_server();

    let response = server
        .post("/auth/register")
        .json(&serde_json::json!({ "username": "alice" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/auth/register")
        .json(&serde_json::json!({ "password": "p@ss" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_unknown_role_rejected() {
    let server = test_server();

    let response = server
        .post("/auth/register")
        .json(&serde_json::json!({
            "username": "alice",
            "password": "p@ss",
            "role": "Superuser"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_delivers_same_token_in_cookie_and_body() {
    let server = test_server();
    register_user(&server, "alice", "p@ss", None).await;

    let response = server
        .post("/auth/login")
        .json(&serde_json::json!({
            "username": "alice",
            "password": "p@ss"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Login successful");

    let token = body["token"].as_str().unwrap();
    let cookie = response.cookie(SESSION_COOKIE);
    assert_eq!(cookie.value(), token);
    assert_eq!(cookie.http_only(), Some(true));

    // Claims embed the registered identity with the default role.
    let claims = verifier().verify(token).unwrap();
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.role, Role::User);
}

#[tokio::test]
async fn test_login_missing_fields() {
    let server = test_server();

    let response = server
        .post("/auth/login")
        .json(&serde_json::json!({ "username": "alice" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
    let server = test_server();
    register_user(&server, "alice", "p@ss", None).await;

    let wrong_password = server
        .post("/auth/login")
        .json(&serde_json::json!({
            "username": "alice",
            "password": "not-the-password"
        }))
        .await;
    let unknown_user = server
        .post("/auth/login")
        .json(&serde_json::json!({
            "username": "mallory",
            "password": "whatever"
        }))
        .await;

    assert_eq!(wrong_password.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_user.status_code(), StatusCode::BAD_REQUEST);
    // Byte-identical bodies: no username enumeration.
    assert_eq!(wrong_password.text(), unknown_user.text());
}

#[tokio::test]
async fn test_profile_accepts_bearer_header() {
    let server = test_server();
    register_user(&server, "alice", "p@ss", None).await;
    let token = login_token(&server, "alice", "p@ss").await;

    let response = server
        .get("/api/profile")
        .add_header("Authorization", auth_header(&token))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "User");
}

#[tokio::test]
async fn test_profile_accepts_session_cookie() {
    let server = test_server();
    register_user(&server, "alice", "p@ss", None).await;
    let token = login_token(&server, "alice", "p@ss").await;

    let response = server
        .get("/api/profile")
        .add_cookie(Cookie::new(SESSION_COOKIE, token))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn test_missing_token_is_401() {
    let server = test_server();

    let response = server.get("/api/profile").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_403() {
    let server = test_server();

    let response = server
        .get("/api/profile")
        .add_header("Authorization", "Bearer not.a.token")
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_403() {
    let server = test_server();

    let other_keys = TokenKeys::new("a-different-secret", DEFAULT_TOKEN_TTL);
    let forged = other_keys
        .issue(&User::new_local("alice".to_string(), "hash".to_string(), Role::Admin))
        .unwrap();

    let response = server
        .get("/api/profile")
        .add_header("Authorization", auth_header(&forged))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_expired_token_is_403() {
    let server = test_server();

    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        username: "alice".to_string(),
        role: Role::User,
        exp: now - 60,
        iat: now - 3600,
    };
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let response = server
        .get("/api/profile")
        .add_header("Authorization", auth_header(&expired))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cookie_takes_precedence_over_header() {
    let server = test_server();
    register_user(&server, "alice", "p@ss", None).await;
    let token = login_token(&server, "alice", "p@ss").await;

    // A bad cookie is not rescued by a valid header: the cookie wins.
    let response = server
        .get("/api/profile")
        .add_cookie(Cookie::new(SESSION_COOKIE, "not.a.token"))
        .add_header("Authorization", auth_header(&token))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_scenario() {
    let server = test_server();

    // Admin registers and logs in; the token carries the Admin role.
    register_user(&server, "alice", "p@ss", Some("Admin")).await;
    let admin_token = login_token(&server, "alice", "p@ss").await;
    let claims = verifier().verify(&admin_token).unwrap();
    assert_eq!(claims.role, Role::Admin);

    let response = server
        .get("/api/admin")
        .add_header("Authorization", auth_header(&admin_token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Hello Admin alice, you have special access.");

    // A freshly registered default-role user is rejected on the same route.
    register_user(&server, "bob", "hunter2", None).await;
    let user_token = login_token(&server, "bob", "hunter2").await;

    let response = server
        .get("/api/admin")
        .add_header("Authorization", auth_header(&user_token))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_dashboard_features_follow_role() {
    let server = test_server();

    register_user(&server, "alice", "p@ss", Some("Admin")).await;
    register_user(&server, "bob", "hunter2", None).await;
    let admin_token = login_token(&server, "alice", "p@ss").await;
    let user_token = login_token(&server, "bob", "hunter2").await;

    let response = server
        .get("/api/dashboard")
        .add_header("Authorization", auth_header(&admin_token))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["features"], serde_json::json!(["A", "B", "C"]));

    let response = server
        .get("/api/dashboard")
        .add_header("Authorization", auth_header(&user_token))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["features"], serde_json::json!(["A"]));
}

#[tokio::test]
async fn test_logout_clears_session_cookie() {
    let server = test_server();

    let response = server.post("/auth/logout").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let cookie = response.cookie(SESSION_COOKIE);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
}

#[tokio::test]
async fn test_google_login_unconfigured_is_503() {
    let server = test_server();

    let response = server.get("/auth/google").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let response = server.get("/auth/google/callback").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = test_server();

    let response = server.get("/definitely-not-a-route").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
