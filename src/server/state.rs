/**
 * Application State Management
 *
 * `AppState` is the central state container shared by every handler and
 * gate. Everything in it is either immutable for the process lifetime
 * (token keys, configuration) or internally synchronized (the user store),
 * so per-request work shares nothing mutable.
 *
 * # Fields
 *
 * * `store` - the user store boundary (PostgreSQL or in-memory)
 * * `tokens` - token issuer/verifier bound to the process secret
 * * `google` - federated-login client, `None` when not configured
 * * `config` - the loaded process configuration
 */

use std::sync::Arc;

use crate::auth::federated::GoogleClient;
use crate::auth::sessions::TokenKeys;
use crate::auth::users::UserStore;
use crate::server::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// User store boundary; `dyn` so tests and degraded mode swap it
    pub store: Arc<dyn UserStore>,
    /// Token issuer/verifier, built once from the config
    pub tokens: Arc<TokenKeys>,
    /// Federated-login client, `None` disables the Google endpoints
    pub google: Option<Arc<GoogleClient>>,
    /// Loaded configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Assemble state from a store and the loaded configuration
    ///
    /// Builds the token keys from the configured secret and TTL and the
    /// Google client when credentials are present.
    pub fn new(store: Arc<dyn UserStore>, config: AppConfig) -> Self {
        let tokens = Arc::new(TokenKeys::new(&config.jwt_secret, config.token_ttl));
        let google = config
            .google
            .clone()
            .map(|google_config| Arc::new(GoogleClient::new(google_config)));

        Self {
            store,
            tokens,
            google,
            config: Arc::new(config),
        }
    }
}
