//! OAuth 2.0 authorization-code client for the identity provider.

use oauth2::basic::BasicClient;
use oauth2::url::Url;
use oauth2::{
    AccessToken, AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use rootcause::prelude::Report;
use tracing::instrument;

use crate::config::GateConfig;

/// Client with the authorization and token endpoints configured.
type ProviderClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// OAuth client for the login redirect and the code exchange.
pub struct OAuthClient {
    client: ProviderClient,
    http_client: reqwest::Client,
    scopes: Vec<Scope>,
}

impl OAuthClient {
    /// Creates a client from configuration.
    ///
    /// `http_client` must not follow redirects and should carry a timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider URL or the callback URL is invalid.
    pub fn new(
        config: &GateConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, Report<OAuthError>> {
        let provider = &config.provider;

        let auth_url = AuthUrl::new(provider.auth_url.clone())
            .map_err(|e| OAuthError::Configuration(format!("invalid auth URL: {}", e)))?;
        let token_url = TokenUrl::new(provider.token_url.clone())
            .map_err(|e| OAuthError::Configuration(format!("invalid token URL: {}", e)))?;
        let redirect_url = RedirectUrl::new(config.redirect_url())
            .map_err(|e| OAuthError::Configuration(format!("invalid redirect URL: {}", e)))?;

        let client = BasicClient::new(ClientId::new(config.app_id.clone()))
            .set_client_secret(ClientSecret::new(config.app_secret.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url)
            .set_auth_type(AuthType::RequestBody);

        let scopes = provider
            .scopes
            .iter()
            .map(|scope| Scope::new(scope.clone()))
            .collect();

        Ok(Self {
            client,
            http_client,
            scopes,
        })
    }

    /// Builds the provider's authorization URL carrying `state`.
    pub fn authorization_url(&self, state: &str) -> Url {
        let state = CsrfToken::new(state.to_string());
        let (url, _) = self
            .client
            .authorize_url(|| state)
            .add_scopes(self.scopes.iter().cloned())
            .url();
        url
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// Makes exactly one request to the token endpoint.
    #[instrument(skip_all)]
    pub async fn exchange(&self, code: &str) -> Result<AccessToken, Report<OAuthError>> {
        if code.is_empty() {
            return Err(OAuthError::MissingCode.into());
        }

        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| OAuthError::TokenExchange(format!("token exchange failed: {}", e)))?;

        Ok(token_response.access_token().clone())
    }
}

/// OAuth-related errors.
#[derive(Debug)]
pub enum OAuthError {
    /// Configuration error (invalid URLs).
    Configuration(String),
    /// The callback carried no authorization code.
    MissingCode,
    /// The provider rejected the code or could not be reached.
    TokenExchange(String),
}

impl std::fmt::Display for OAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "OAuth configuration error: {}", msg),
            Self::MissingCode => write!(f, "no authorization code in callback"),
            Self::TokenExchange(msg) => write!(f, "OAuth token exchange error: {}", msg),
        }
    }
}

impl std::error::Error for OAuthError {}
