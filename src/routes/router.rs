/**
 * Router Configuration
 *
 * Combines the public auth routes and the protected API routes into the
 * application router.
 *
 * # Routes
 *
 * ## Public
 * - `POST /auth/register` - user registration
 * - `POST /auth/login` - credential login
 * - `POST /auth/logout` - clear the session cookie
 * - `GET /auth/google` - redirect to the federated provider
 * - `GET /auth/google/callback` - provider callback
 *
 * ## Protected (authentication gate, see api_routes)
 * - `GET /api/profile`, `GET /api/dashboard`, `GET /api/admin`
 */

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::handlers::{google_callback, google_login, login, logout, register};
use crate::routes::api_routes::configure_api_routes;
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback));

    Router::new()
        .merge(auth_routes)
        .merge(configure_api_routes(state.clone()))
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
