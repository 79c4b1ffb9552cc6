/**
 * Authentication Gate
 *
 * Middleware protecting routes that require an authenticated identity. It
 * extracts the bearer token from the request, verifies it, and attaches
 * the resolved identity to the request extensions for handlers.
 *
 * # Token Transport
 *
 * Two carriers are accepted, checked in a fixed order:
 * 1. The `accessToken` cookie (takes precedence)
 * 2. The `Authorization: Bearer <token>` header
 *
 * # Status Mapping
 *
 * - No token presented: 401 Unauthorized
 * - Malformed token, bad signature, or expired: 403 Forbidden
 *
 * The gate never touches the user store: the claims embedded at issue time
 * are authoritative until the token expires. A role change in the store is
 * therefore not reflected until reissue; that staleness window is accepted.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::auth::sessions::SESSION_COOKIE;
use crate::auth::users::Role;
use crate::error::AuthError;
use crate::server::state::AppState;

/// Authenticated identity extracted from verified token claims
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

/// Authentication middleware
///
/// 1. Extracts the token from cookie or bearer header
/// 2. Verifies signature and expiry
/// 3. Attaches `AuthenticatedUser` to request extensions
///
/// Rejections never attach a context; downstream layers and handlers only
/// ever observe fully verified identities.
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| bearer_token(request.headers()));

    let token = token.ok_or_else(|| {
        tracing::warn!("No access token in cookie or Authorization header");
        AuthError::MissingToken
    })?;

    let claims = state.tokens.verify(&token).map_err(|rejection| {
        tracing::warn!("Token rejected: {:?}", rejection);
        AuthError::from(rejection)
    })?;

    // The sub claim is one of our own UUIDs; anything else means the token
    // body was tampered with past the signature check's reach.
    let id = Uuid::parse_str(&claims.sub).map_err(|_| {
        tracing::warn!("Token carries non-UUID subject");
        AuthError::MalformedToken
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        id,
        username: claims.username,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Axum extractor for the authenticated user
///
/// Usable as a handler parameter on any route behind `authenticate`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("AuthUser requested on a route without the authentication gate");
                AuthError::MissingToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_auth_user_extractor() {
        let request = HttpRequest::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let user = AuthenticatedUser {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            role: Role::User,
        };
        parts.extensions.insert(user.clone());

        let extracted = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.0.id, user.id);
        assert_eq!(extracted.0.username, "alice");
    }

    #[tokio::test]
    async fn test_auth_user_extractor_missing() {
        let request = HttpRequest::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }
}
