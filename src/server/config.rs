/**
 * Server Configuration
 *
 * Loads the process configuration from environment variables into one
 * immutable `AppConfig` value. Components receive the parts they need at
 * construction time; nothing else in the crate reads the environment, so
 * every component stays swappable per test.
 *
 * # Configuration Sources
 *
 * - `SERVER_PORT` - listen port (default 3000)
 * - `JWT_SECRET` - token signing secret (dev fallback with a warning)
 * - `TOKEN_TTL_SECS` - token lifetime in seconds (default 3600)
 * - `COOKIE_SECURE` - set the Secure flag on session cookies (default false)
 * - `DATABASE_URL` - optional PostgreSQL connection string
 * - `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET` / `GOOGLE_CALLBACK_URL` -
 *   optional as a group; federated login is disabled when absent
 *
 * # Error Handling
 *
 * Missing optional configuration never prevents startup. Services that
 * cannot be configured are disabled and the server continues without them.
 */

use std::time::Duration;

use sqlx::PgPool;

use crate::auth::sessions::DEFAULT_TOKEN_TTL;

/// Google OAuth client credentials
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

/// Immutable process configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen port for the HTTP server
    pub server_port: u16,
    /// Process-wide token signing secret
    pub jwt_secret: String,
    /// Token lifetime; also the session cookie lifetime
    pub token_ttl: Duration,
    /// Whether session cookies carry the Secure flag
    pub cookie_secure: bool,
    /// Optional PostgreSQL connection string
    pub database_url: Option<String>,
    /// Optional federated-login credentials
    pub google: Option<GoogleConfig>,
}

impl AppConfig {
    /// Load configuration from the environment
    pub fn from_env() -> Self {
        let server_port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using an insecure development secret");
            "change-me-in-production".to_string()
        });

        let token_ttl = std::env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_TTL);

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);

        let database_url = std::env::var("DATABASE_URL").ok();

        let google = match (
            std::env::var("GOOGLE_CLIENT_ID"),
            std::env::var("GOOGLE_CLIENT_SECRET"),
            std::env::var("GOOGLE_CALLBACK_URL"),
        ) {
            (Ok(client_id), Ok(client_secret), Ok(callback_url)) => Some(GoogleConfig {
                client_id,
                client_secret,
                callback_url,
            }),
            _ => {
                tracing::warn!(
                    "Google OAuth credentials not fully configured. Federated login disabled."
                );
                None
            }
        };

        Self {
            server_port,
            jwt_secret,
            token_ttl,
            cookie_secure,
            database_url,
            google,
        }
    }
}

/// Connect to PostgreSQL and run migrations
///
/// Returns `None` when `DATABASE_URL` is unset or the connection fails;
/// the caller falls back to the in-memory store so the server still runs.
pub async fn load_database(config: &AppConfig) -> Option<PgPool> {
    let database_url = match &config.database_url {
        Some(url) => url,
        None => {
            tracing::warn!("DATABASE_URL not set. Using the in-memory user store.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to the in-memory user store.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed"),
        Err(e) => {
            // Migrations may already have been applied by an earlier run.
            tracing::error!("Failed to run database migrations: {:?}", e);
            tracing::warn!("Continuing - database might not be up to date");
        }
    }

    Some(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_shape_for_tests() {
        // The struct is plain data; tests build it directly.
        let config = AppConfig {
            server_port: 0,
            jwt_secret: "test-secret".to_string(),
            token_ttl: Duration::from_secs(60),
            cookie_secure: false,
            database_url: None,
            google: None,
        };
        assert_eq!(config.token_ttl.as_secs(), 60);
        assert!(config.google.is_none());
    }
}
