/**
 * Google Federated Login Handlers
 *
 * Implements GET /auth/google and GET /auth/google/callback.
 *
 * # Flow
 *
 * 1. `/auth/google` generates a random state value, stores it in a
 *    short-lived httpOnly cookie, and redirects to Google's consent screen
 * 2. Google redirects back with `code` and the echoed `state`
 * 3. `/auth/google/callback` compares the state values, exchanges the code
 *    for a verified external identity, find-or-creates the local user, and
 *    establishes a session exactly like a password login
 *
 * Provider-side failures (denied consent, bad code, state mismatch) map to
 * 401. When no Google credentials are configured the endpoints answer 503.
 */

use axum::{
    extract::{Query, State},
    response::{Json, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::federated::federated_login;
use crate::auth::handlers::types::LoginResponse;
use crate::auth::sessions::session_cookie;
use crate::error::AuthError;
use crate::server::state::AppState;

/// Cookie carrying the OAuth state value between redirect and callback
const OAUTH_STATE_COOKIE: &str = "oauthState";

/// State cookie lifetime; abandoned flows expire client-side
const OAUTH_STATE_TTL: time::Duration = time::Duration::minutes(10);

/// Query parameters Google appends to the callback redirect
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Redirect to Google's consent screen
pub async fn google_login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AuthError> {
    let google = state.google.as_ref().ok_or_else(|| {
        tracing::error!("Google login requested but OAuth credentials are not configured");
        AuthError::ProviderUnavailable
    })?;

    let state_value = Uuid::new_v4().to_string();
    let url = google.authorize_url(&state_value);

    let state_cookie = Cookie::build((OAUTH_STATE_COOKIE, state_value))
        .path("/auth/google")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(OAUTH_STATE_TTL)
        .build();

    Ok((jar.add(state_cookie), Redirect::temporary(&url)))
}

/// Handle the provider callback and establish a session
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(CookieJar, Json<LoginResponse>), AuthError> {
    let google = state.google.as_ref().ok_or_else(|| {
        tracing::error!("Google callback reached but OAuth credentials are not configured");
        AuthError::ProviderUnavailable
    })?;

    let code = query.code.ok_or_else(|| {
        tracing::warn!("Google callback without authorization code");
        AuthError::ProviderRejected
    })?;

    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    match (query.state.as_deref(), expected_state.as_deref()) {
        (Some(returned), Some(expected)) if returned == expected => {}
        _ => {
            tracing::warn!("Google callback state mismatch");
            return Err(AuthError::ProviderRejected);
        }
    }

    let identity = google.exchange_code(&code).await?;
    let user = federated_login(state.store.as_ref(), identity).await?;

    let token = state.tokens.issue(&user)?;
    let jar = jar
        .remove(Cookie::build((OAUTH_STATE_COOKIE, "")).path("/auth/google").build())
        .add(session_cookie(
            token.clone(),
            state.tokens.ttl(),
            state.config.cookie_secure,
        ));

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token,
        }),
    ))
}
