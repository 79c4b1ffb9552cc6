/**
 * Server Initialization
 *
 * Builds the Axum application from loaded configuration.
 *
 * # Initialization Steps
 *
 * 1. Connect to PostgreSQL and migrate, or fall back to the in-memory
 *    store when no database is configured
 * 2. Assemble `AppState` (store, token keys, optional Google client)
 * 3. Create the router with all routes and gates
 */

use std::sync::Arc;

use axum::Router;

use crate::auth::users::{MemoryUserStore, PgUserStore, UserStore};
use crate::routes::create_router;
use crate::server::config::{load_database, AppConfig};
use crate::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app(config: AppConfig) -> Router {
    tracing::info!("Initializing authgate server");

    let store: Arc<dyn UserStore> = match load_database(&config).await {
        Some(pool) => Arc::new(PgUserStore::new(pool)),
        None => Arc::new(MemoryUserStore::new()),
    };

    let state = AppState::new(store, config);

    tracing::info!(
        "Router configured (federated login: {})",
        if state.google.is_some() { "enabled" } else { "disabled" }
    );

    create_router(state)
}
