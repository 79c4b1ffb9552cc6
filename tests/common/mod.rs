//! Shared test helpers
//!
//! Builds the application over an in-memory user store so the suite needs
//! no external services, and provides user-factory helpers for the
//! authentication flows.

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;

use authgate::auth::users::MemoryUserStore;
use authgate::routes::create_router;
use authgate::server::{AppConfig, AppState};

/// Signing secret the test server is built with
pub const TEST_SECRET: &str = "test-secret";

/// Configuration for a self-contained test server
pub fn test_config() -> AppConfig {
    AppConfig {
        server_port: 0,
        jwt_secret: TEST_SECRET.to_string(),
        token_ttl: Duration::from_secs(3600),
        cookie_secure: false,
        database_url: None,
        google: None,
    }
}

/// Create a test server over a fresh in-memory store
pub fn test_server() -> TestServer {
    let state = AppState::new(Arc::new(MemoryUserStore::new()), test_config());
    TestServer::new(create_router(state)).unwrap()
}

/// Register a user through the HTTP surface
pub async fn register_user(server: &TestServer, username: &str, password: &str, role: Option<&str>) {
    let mut body = serde_json::json!({
        "username": username,
        "password": password,
    });
    if let Some(role) = role {
        body["role"] = serde_json::Value::String(role.to_string());
    }

    let response = server.post("/auth/register").json(&body).await;
    assert_eq!(
        response.status_code(),
        axum::http::StatusCode::CREATED,
        "registration failed for {username}: {}",
        response.text()
    );
}

/// Log a user in and return the issued token
pub async fn login_token(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/auth/login")
        .json(&serde_json::json!({
            "username": username,
            "password": password,
        }))
        .await;
    assert_eq!(
        response.status_code(),
        axum::http::StatusCode::OK,
        "login failed for {username}: {}",
        response.text()
    );

    let body: serde_json::Value = response.json();
    body["token"].as_str().expect("login response carries a token").to_string()
}

/// Authorization header value for a token
pub fn auth_header(token: &str) -> String {
    format!("Bearer {token}")
}
