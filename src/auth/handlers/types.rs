/**
 * Authentication Handler Types
 *
 * Request and response types shared by the registration, login and profile
 * handlers.
 *
 * Request fields are `Option<String>` on purpose: a missing field must
 * produce the service's own 400 `invalid request` response rather than a
 * deserializer-level rejection, and the handlers validate presence
 * themselves.
 */

use serde::{Deserialize, Serialize};

use crate::auth::users::Role;

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    /// Desired username (unique)
    pub username: Option<String>,
    /// Plaintext password (hashed before storage, never persisted)
    pub password: Option<String>,
    /// Requested role; defaults to `User` when absent
    pub role: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Plain message response, used by registration and logout
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

/// Login response
///
/// The token in the body is byte-identical to the one set in the
/// `accessToken` cookie, so non-cookie clients can pick it up here.
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// User info response (no sensitive data)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserResponse {
    /// User's unique ID (UUID)
    pub id: String,
    /// Username
    pub username: String,
    /// Role, as embedded in the presented token
    pub role: Role,
}
