/**
 * Token Issuance, Verification and Session Cookies
 *
 * This module owns the signed bearer token: a compact HMAC-SHA256 JWT
 * embedding the identity claims (user id, username, role) plus issue and
 * expiry timestamps. It also owns the cookie policy used to carry the token
 * between client and server.
 *
 * The signing secret is not read from ambient state. `TokenKeys` is built
 * once from configuration and stored in the application state, which keeps
 * issuance and verification swappable per test.
 *
 * Claims are embedded verbatim at issue time and never re-fetched from the
 * store during verification; a role change in the store becomes visible
 * only when the token expires and a new one is issued.
 */

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::users::{Role, User};
use crate::error::AuthError;

/// Name of the session cookie carrying the token
pub const SESSION_COOKIE: &str = "accessToken";

/// Default token lifetime: one hour
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Identity claims embedded in every issued token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (UUID, stringified)
    pub sub: String,
    /// Username at issue time
    pub username: String,
    /// Role at issue time; authorization reads this, not the store
    pub role: Role,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: u64,
    /// Issued at time (Unix timestamp, seconds)
    pub iat: u64,
}

/// Why a presented token was rejected
///
/// All four reasons are distinguishable to callers. The HTTP layer
/// collapses `Malformed`, `InvalidSignature` and `Expired` to 403 while
/// `Missing` maps to 401, but gates and tests see the precise reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// No token was presented at all
    Missing,
    /// The token could not be decoded or parsed
    Malformed,
    /// The signature does not verify against the process secret
    InvalidSignature,
    /// The token is past its absolute expiry
    Expired,
}

impl From<TokenRejection> for AuthError {
    fn from(rejection: TokenRejection) -> Self {
        match rejection {
            TokenRejection::Missing => AuthError::MissingToken,
            TokenRejection::Malformed => AuthError::MalformedToken,
            TokenRejection::InvalidSignature => AuthError::InvalidSignature,
            TokenRejection::Expired => AuthError::ExpiredToken,
        }
    }
}

/// Token issuer and verifier bound to one signing secret and TTL
///
/// Immutable for the process lifetime. Issuance is the sole producer of
/// identity claims; verification is pure and never touches I/O.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    /// Create keys from the process secret and token TTL
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::default();
        // Absolute expiry, no grace window
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// The configured token lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a signed token for a user
    ///
    /// Serializes `{id, username, role}` with `iat = now` and
    /// `exp = now + ttl`, signed with the process secret.
    ///
    /// # Errors
    ///
    /// Fails only if JWT encoding itself fails; wrapped as
    /// `AuthError::Internal`.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AuthError::internal(format!("system clock error: {e}")))?
            .as_secs();

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            exp: now + self.ttl.as_secs(),
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::internal(format!("token encoding failed: {e}")))
    }

    /// Verify a presented token and reconstruct its claims
    ///
    /// Checks structural validity, signature authenticity and
    /// `now < exp`, in that order of reporting. Attacker-controlled input
    /// never panics; every decode failure becomes a `TokenRejection`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenRejection> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenRejection::Expired,
                ErrorKind::InvalidSignature => TokenRejection::InvalidSignature,
                _ => TokenRejection::Malformed,
            })
    }
}

/// Build the session cookie carrying a freshly issued token
///
/// httpOnly, scoped to the whole site, SameSite=Lax, lifetime equal to the
/// token TTL. The `secure` flag follows configuration so local HTTP
/// development still receives the cookie.
pub fn session_cookie(token: String, ttl: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.as_secs() as i64))
        .build()
}

/// Build a cookie that removes the session cookie on the client
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}
