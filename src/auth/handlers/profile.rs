/**
 * Profile Handler
 *
 * Implements GET /api/profile: echoes the identity resolved by the
 * authentication gate. No store lookup happens here; the response reflects
 * the claims embedded in the presented token.
 */

use axum::response::Json;

use crate::auth::handlers::types::UserResponse;
use crate::middleware::auth::AuthUser;

/// Current-identity handler; requires the authentication gate
pub async fn profile(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse {
        id: user.id.to_string(),
        username: user.username,
        role: user.role,
    })
}
