/**
 * Authorization Gate
 *
 * Role check for already-authenticated requests. One gate covers both the
 * "exactly one role" and "any of N roles" forms: pass the allowed set as a
 * slice. Stateless, composable after the authentication gate on any route.
 *
 * A request with no authenticated context, or whose role is not in the
 * allowed set, is rejected with 403 Forbidden.
 */

use axum::{extract::Request, middleware::Next, response::Response};

use crate::auth::users::Role;
use crate::error::AuthError;
use crate::middleware::auth::AuthenticatedUser;

/// Require the authenticated identity to hold one of the allowed roles
///
/// Wire it per-route with a closure that fixes the set:
///
/// ```rust,ignore
/// .route_layer(middleware::from_fn(|req, next| {
///     require_role(&[Role::Admin], req, next)
/// }))
/// ```
pub async fn require_role(
    allowed: &[Role],
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(user) if allowed.contains(&user.role) => Ok(next.run(request).await),
        Some(user) => {
            tracing::warn!(
                "Role {} not allowed for this route (user: {})",
                user.role.as_str(),
                user.username
            );
            Err(AuthError::Forbidden)
        }
        None => {
            tracing::warn!("Authorization gate reached without authenticated context");
            Err(AuthError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(allowed: &'static [Role]) -> Router {
        Router::new()
            .route("/probe", get(|| async { "ok" }))
            .route_layer(middleware::from_fn(move |request, next| {
                require_role(allowed, request, next)
            }))
    }

    async fn probe(app: Router, user: Option<AuthenticatedUser>) -> StatusCode {
        let mut request = HttpRequest::builder()
            .uri("/probe")
            .body(Body::empty())
            .unwrap();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        app.oneshot(request).await.unwrap().status()
    }

    fn user_with_role(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            username: "probe".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_matching_role_passes_through() {
        let status = probe(app(&[Role::Admin]), Some(user_with_role(Role::Admin))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_role_forbidden() {
        let status = probe(app(&[Role::Admin]), Some(user_with_role(Role::User))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_any_of_set_accepts_each_member() {
        let allowed: &'static [Role] = &[Role::User, Role::Admin];
        assert_eq!(probe(app(allowed), Some(user_with_role(Role::User))).await, StatusCode::OK);
        assert_eq!(probe(app(allowed), Some(user_with_role(Role::Admin))).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_absent_context_forbidden() {
        let status = probe(app(&[Role::Admin]), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
