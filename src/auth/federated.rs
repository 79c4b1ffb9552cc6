/**
 * Federated Identity Bridge
 *
 * Exchanges a provider-asserted external identity for a local user record.
 * The provider has already authenticated the principal out-of-band, so
 * federated logins skip password verification entirely: find-or-create by
 * federated id, then hand the user straight to session establishment.
 *
 * `GoogleClient` wraps the provider handshake itself (consent redirect,
 * code exchange, userinfo fetch). Everything the rest of the crate needs
 * from it is the resulting `ExternalIdentity`.
 */

use serde::Deserialize;
use url::Url;

use crate::auth::users::{User, UserStore};
use crate::error::AuthError;
use crate::server::config::GoogleConfig;

/// Google OAuth endpoints
const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// A provider-verified external identity
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalIdentity {
    /// Stable subject id asserted by the provider
    pub external_id: String,
    /// Human-readable display name, used as the local username seed
    pub display_name: String,
}

/// Resolve an external identity to a local user record
///
/// Find-or-create by `federated_id`; first occurrence creates a record with
/// role `User`, later logins reuse the same local identity.
pub async fn federated_login(
    store: &dyn UserStore,
    identity: ExternalIdentity,
) -> Result<User, AuthError> {
    let user = store
        .find_or_create_federated(&identity.external_id, &identity.display_name)
        .await?;

    tracing::info!(
        "Federated login resolved to local user: {} ({})",
        user.username,
        user.id
    );

    Ok(user)
}

/// Token endpoint response; only the access token is consumed
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Userinfo payload; `name` may be absent for restricted profiles
#[derive(Deserialize)]
struct UserInfo {
    id: String,
    name: Option<String>,
}

/// Client for the Google OAuth authorization-code flow
pub struct GoogleClient {
    http: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleClient {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Build the consent-screen URL the login endpoint redirects to
    ///
    /// `state` is echoed back by the provider on the callback and compared
    /// against the value stored client-side during the redirect.
    pub fn authorize_url(&self, state: &str) -> String {
        // Static base URL plus url-encoded params; cannot fail to parse.
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid profile"),
                ("state", state),
            ],
        )
        .expect("static authorize URL must parse");

        url.into()
    }

    /// Exchange an authorization code for the provider-verified identity
    ///
    /// Performs the code-for-token exchange and the userinfo fetch. Every
    /// provider-side failure collapses to `AuthError::ProviderRejected`;
    /// the detail is logged, not echoed.
    pub async fn exchange_code(&self, code: &str) -> Result<ExternalIdentity, AuthError> {
        let token: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!("Google code exchange failed: {}", e);
                AuthError::ProviderRejected
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::warn!("Google token response unreadable: {}", e);
                AuthError::ProviderRejected
            })?;

        let info: UserInfo = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!("Google userinfo fetch failed: {}", e);
                AuthError::ProviderRejected
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::warn!("Google userinfo response unreadable: {}", e);
                AuthError::ProviderRejected
            })?;

        let display_name = info
            .name
            .unwrap_or_else(|| format!("google-user-{}", &info.id));

        Ok(ExternalIdentity {
            external_id: info.id,
            display_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::users::{MemoryUserStore, Role};

    fn google_config() -> GoogleConfig {
        GoogleConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            callback_url: "http://localhost:3000/auth/google/callback".to_string(),
        }
    }

    #[tokio::test]
    async fn test_federated_login_creates_then_reuses() {
        let store = MemoryUserStore::new();
        let identity = ExternalIdentity {
            external_id: "google-789".to_string(),
            display_name: "Carol".to_string(),
        };

        let first = federated_login(&store, identity.clone()).await.unwrap();
        let second = federated_login(&store, identity).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.username, second.username);
        assert_eq!(first.role, Role::User);
    }

    #[test]
    fn test_authorize_url_carries_params() {
        let client = GoogleClient::new(google_config());
        let url = client.authorize_url("state-abc");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("state=state-abc"));
        assert!(url.contains("response_type=code"));
        // redirect_uri must be url-encoded
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fgoogle%2Fcallback"));
    }
}
