/**
 * Logout Handler
 *
 * Implements POST /auth/logout. There is no server-side session to revoke;
 * logout is the client-side end of the carrier lifecycle, clearing the
 * `accessToken` cookie. An already-issued token stays valid until its
 * expiry.
 */

use axum::{extract::State, response::Json};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::handlers::types::MessageResponse;
use crate::auth::sessions::clear_session_cookie;
use crate::server::state::AppState;

/// Logout handler; idempotent, requires no authentication
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(clear_session_cookie(state.config.cookie_secure)),
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}
