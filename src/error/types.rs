/**
 * Auth Error Types
 *
 * This module defines the error taxonomy for the authentication and
 * authorization core. Every identity/credential failure is caught at the
 * gate or flow boundary and converted to one of these variants; none
 * propagate as unhandled faults.
 *
 * # Status Code Mapping
 *
 * - `InvalidRequest`, `DuplicateUsername`, `InvalidCredentials` - 400
 * - `MissingToken`, `ProviderRejected` - 401
 * - `MalformedToken`, `InvalidSignature`, `ExpiredToken`, `Forbidden` - 403
 * - `StoreUnavailable`, `Internal` - 500
 * - `ProviderUnavailable` - 503
 *
 * The mapping is fixed: a missing token is 401, every other token rejection
 * is 403. Wrong-password and unknown-username both map to the same
 * `InvalidCredentials` variant so the two responses are indistinguishable.
 */

use thiserror::Error;
use axum::http::StatusCode;

/// Errors produced by the authentication/authorization core
///
/// Each variant maps to exactly one HTTP status code and one client-visible
/// message. Server-side failures (`StoreUnavailable`, `Internal`) carry
/// internal detail for logging but never echo it to the client.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed request input (empty username, unknown role, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Registration attempted with a username that already exists
    #[error("Username already exists")]
    DuplicateUsername,

    /// Login failed: unknown username or wrong password
    ///
    /// Deliberately a single variant. The response for a nonexistent user
    /// and a wrong password must be byte-identical to prevent username
    /// enumeration.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No token presented on a protected route
    #[error("Access denied. No token provided.")]
    MissingToken,

    /// Token could not be decoded or parsed
    #[error("Invalid or expired token.")]
    MalformedToken,

    /// Token signature does not verify against the process secret
    #[error("Invalid or expired token.")]
    InvalidSignature,

    /// Token expiry has passed
    #[error("Invalid or expired token.")]
    ExpiredToken,

    /// Authenticated identity does not hold a required role
    #[error("Forbidden: insufficient role")]
    Forbidden,

    /// The federated provider rejected the login
    #[error("Federated login failed")]
    ProviderRejected,

    /// Federated login attempted but no provider is configured
    #[error("Federated login is not configured")]
    ProviderUnavailable,

    /// The user store could not serve the request
    #[error("Server error")]
    StoreUnavailable(#[source] crate::auth::users::StoreError),

    /// Internal failure (hashing, token encoding, ...)
    ///
    /// The detail string is logged, never sent to the client.
    #[error("Server error")]
    Internal(String),
}

impl AuthError {
    /// Create an `InvalidRequest` error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an `Internal` error
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_)
            | Self::DuplicateUsername
            | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::MissingToken | Self::ProviderRejected => StatusCode::UNAUTHORIZED,
            Self::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::MalformedToken
            | Self::InvalidSignature
            | Self::ExpiredToken
            | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::StoreUnavailable(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-visible message for this error
    ///
    /// This is the `Display` text. For 5xx variants it is a generic
    /// "Server error" with no internal detail.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<crate::auth::users::StoreError> for AuthError {
    fn from(err: crate::auth::users::StoreError) -> Self {
        match err {
            crate::auth::users::StoreError::Duplicate => Self::DuplicateUsername,
            other => Self::StoreUnavailable(other),
        }
    }
}
