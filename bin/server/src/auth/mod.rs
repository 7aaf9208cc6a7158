//! Authentication module for the fbrp gate.
//!
//! This module provides:
//! - OAuth authorization-code login against the identity provider
//! - A live group-membership check at login time
//! - A signed cookie session holding one "authenticated" flag
//! - Middleware that gates the file routes on that flag
//!
//! # Authorization Model
//!
//! A browser is allowed to read files if and only if its last completed
//! login found the configured secret group in the user's profile. The result
//! is recorded in the session cookie and never re-checked until the next
//! login or logout. Both "not logged in" and "not in the group" are denied
//! with 403.

pub mod groups;
pub mod middleware;
pub mod oauth;
pub mod routes;
pub mod session;

use axum_extra::extract::cookie::Key;
use rootcause::prelude::Report;
use std::sync::Arc;

use crate::config::GateConfig;
use crate::error::ServerError;
use crate::pages::Pages;

pub use groups::GroupChecker;
pub use middleware::require_auth;
pub use oauth::OAuthClient;
pub use routes::{callback, login, logout};
pub use session::Session;

/// Shared application state.
///
/// Cheap to clone; everything is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    config: Arc<GateConfig>,
    oauth_client: Arc<OAuthClient>,
    group_checker: Arc<GroupChecker>,
    pages: Arc<Pages>,
    cookie_key: Key,
}

impl AppState {
    /// Builds the application state from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the HTTP client
    /// cannot be built, a provider URL is malformed, or the page template
    /// does not compile.
    pub fn new(config: GateConfig) -> Result<Self, Report<ServerError>> {
        config.validate().map_err(ServerError::from)?;

        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.provider.timeout())
            .build()
            .map_err(|e| ServerError::HttpClient {
                details: e.to_string(),
            })?;

        let oauth_client =
            OAuthClient::new(&config, http_client.clone()).map_err(|e| ServerError::OAuth {
                details: e.to_string(),
            })?;
        let group_checker = GroupChecker::new(&config, http_client);
        let pages = Pages::new().map_err(|e| ServerError::Template {
            details: e.to_string(),
        })?;
        let cookie_key = session::signing_key(&config.session_secret);

        Ok(Self {
            config: Arc::new(config),
            oauth_client: Arc::new(oauth_client),
            group_checker: Arc::new(group_checker),
            pages: Arc::new(pages),
            cookie_key,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub(crate) fn shared_config(&self) -> Arc<GateConfig> {
        Arc::clone(&self.config)
    }

    /// Returns the OAuth client.
    pub fn oauth_client(&self) -> &OAuthClient {
        &self.oauth_client
    }

    /// Returns the group membership checker.
    pub fn group_checker(&self) -> &GroupChecker {
        &self.group_checker
    }

    /// Returns the page renderer.
    pub fn pages(&self) -> &Pages {
        &self.pages
    }

    /// Returns the session cookie signing key.
    pub fn cookie_key(&self) -> &Key {
        &self.cookie_key
    }
}
