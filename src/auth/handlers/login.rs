/**
 * Login Handler
 *
 * Implements POST /auth/login.
 *
 * # Authentication Process
 *
 * 1. Validate presence of username and password
 * 2. Look up the user by username
 * 3. Verify the password (bcrypt, on the blocking pool)
 * 4. Issue a signed token (1 hour TTL by default)
 * 5. Deliver it twice: `accessToken` httpOnly cookie and the JSON body
 *
 * # Security Notes
 *
 * Unknown username, wrong password, and a password login against a
 * federated-only account all produce the byte-identical
 * `400 Invalid username or password` response, so the endpoint cannot be
 * used to enumerate usernames. Passwords are never logged.
 */

use axum::{extract::State, response::Json};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::auth::password::verify_password;
use crate::auth::sessions::session_cookie;
use crate::error::AuthError;
use crate::server::state::AppState;

/// Login handler
///
/// # Errors
///
/// * `400` - missing field, or credentials that do not verify
/// * `500` - store failure or token issuance failure
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AuthError> {
    let username = request
        .username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AuthError::invalid_request("username and password required"))?;
    let password = request
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AuthError::invalid_request("username and password required"))?;

    tracing::info!("Login request for username: {}", username);

    let user = state
        .store
        .find_by_username(&username)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login failed, unknown username: {}", username);
            AuthError::InvalidCredentials
        })?;

    // Federated-only accounts have no local password and cannot log in here.
    let stored_hash = user.password_hash.clone().ok_or_else(|| {
        tracing::warn!("Login failed, no local credential: {}", username);
        AuthError::InvalidCredentials
    })?;

    let password_ok =
        tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::internal(format!("verification task failed: {e}")))?;

    if !password_ok {
        tracing::warn!("Login failed, wrong password for: {}", username);
        return Err(AuthError::InvalidCredentials);
    }

    let token = state.tokens.issue(&user)?;
    let cookie = session_cookie(token.clone(), state.tokens.ttl(), state.config.cookie_secure);

    tracing::info!("User logged in: {} ({})", user.username, user.id);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token,
        }),
    ))
}
