/**
 * Registration Handler
 *
 * Implements POST /auth/register.
 *
 * # Registration Process
 *
 * 1. Validate presence of username and password, parse the optional role
 * 2. Check the store for an existing username
 * 3. Hash the password (bcrypt, on the blocking pool)
 * 4. Create the user record, role defaulting to `User`
 * 5. Respond `201 Created`
 *
 * Registration never issues a token; register and login are distinct
 * operations.
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::auth::handlers::types::{MessageResponse, RegisterRequest};
use crate::auth::password::hash_password;
use crate::auth::users::{Role, User};
use crate::error::AuthError;
use crate::server::state::AppState;

/// Registration handler
///
/// # Errors
///
/// * `400` - missing username/password, unknown role, or duplicate username
/// * `500` - store failure or hashing failure
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    let username = request
        .username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AuthError::invalid_request("username and password required"))?;
    let password = request
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AuthError::invalid_request("username and password required"))?;

    let role = match request.role.as_deref() {
        None => Role::User,
        Some(value) => Role::parse(value)
            .ok_or_else(|| AuthError::invalid_request("unknown role"))?,
    };

    tracing::info!("Registration request for username: {}", username);

    if state.store.find_by_username(&username).await?.is_some() {
        tracing::warn!("Registration rejected, username taken: {}", username);
        return Err(AuthError::DuplicateUsername);
    }

    // bcrypt is deliberately slow; keep it off the async worker threads.
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::internal(format!("hashing task failed: {e}")))??;

    let user = state
        .store
        .create(User::new_local(username, password_hash, role))
        .await?;

    tracing::info!("User registered: {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Registration successful".to_string(),
        }),
    ))
}
