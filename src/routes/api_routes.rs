/**
 * Protected API Routes
 *
 * Routes behind the authentication gate, with the admin surface behind an
 * additional role requirement:
 *
 * - `GET /api/profile` - identity claims of the caller
 * - `GET /api/dashboard` - role-dependent feature list
 * - `GET /api/admin` - requires the `Admin` role
 *
 * The gates compose per-route: `authenticate` wraps the whole group and
 * the role gate wraps only the admin routes, so a request passes the
 * authentication gate, then the authorization gate, then the handler.
 */

use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};

use crate::auth::handlers::profile;
use crate::auth::users::Role;
use crate::middleware::auth::{authenticate, AuthUser};
use crate::middleware::role::require_role;
use crate::server::state::AppState;

/// Configure the protected `/api` routes
pub fn configure_api_routes(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/api/admin", get(admin_panel))
        .route_layer(middleware::from_fn(|request, next| {
            require_role(&[Role::Admin], request, next)
        }));

    Router::new()
        .route("/api/profile", get(profile))
        .route("/api/dashboard", get(dashboard))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

/// Dashboard handler; feature set depends on the caller's role
async fn dashboard(AuthUser(user): AuthUser) -> Json<Value> {
    let features = match user.role {
        Role::Admin => vec!["A", "B", "C"],
        Role::User => vec!["A"],
    };

    Json(json!({
        "message": format!("Welcome to your dashboard, {}!", user.username),
        "features": features,
    }))
}

/// Admin-only handler
async fn admin_panel(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({
        "message": format!("Hello Admin {}, you have special access.", user.username),
    }))
}
