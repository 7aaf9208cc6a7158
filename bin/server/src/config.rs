//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the gate, loaded via
//! the `config` crate from a JSON file. Any top-level field can be overridden
//! from the environment with an `FBRP_` prefix (e.g. `FBRP_SESSION_SECRET`).

use config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::routes::CALLBACK_ROUTE;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "./fbrp.config";

/// Longest cookie lifetime accepted, in days. Browsers cap Max-Age at 400.
pub const MAX_COOKIE_AGE_DAYS: i64 = 400;

/// Gate configuration. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    /// OAuth application (client) ID.
    pub app_id: String,

    /// OAuth application secret.
    pub app_secret: String,

    /// Externally visible host (and optional port) used for the callback URL.
    pub hostname: String,

    /// Group whose members may access the files.
    pub secret_group_id: String,

    /// Directory served under `/files`.
    pub serve_root: PathBuf,

    /// Port to listen on.
    pub internal_port: u16,

    /// Secret from which the session cookie signing key is derived.
    /// Must not be empty.
    pub session_secret: String,

    /// Identity provider endpoints.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Session cookie settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Identity provider endpoints and request settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Profile endpoint queried for group membership.
    #[serde(default = "default_profile_url")]
    pub profile_url: String,

    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Scheme of the callback URL handed to the provider.
    #[serde(default = "default_redirect_scheme")]
    pub redirect_scheme: String,

    /// Upper bound for each outbound call, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Cookie lifetime in days.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to false since the callback URL is plain http by default.
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_auth_url() -> String {
    "https://www.facebook.com/dialog/oauth".to_string()
}

fn default_token_url() -> String {
    "https://graph.facebook.com/oauth/access_token".to_string()
}

fn default_profile_url() -> String {
    "https://graph.facebook.com/v2.3/me".to_string()
}

fn default_scopes() -> Vec<String> {
    vec!["user_about_me".to_string(), "user_groups".to_string()]
}

fn default_redirect_scheme() -> String {
    "http".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_cookie_name() -> String {
    "fbrp_session".to_string()
}

fn default_max_age_days() -> i64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            profile_url: default_profile_url(),
            scopes: default_scopes(),
            redirect_scheme: default_redirect_scheme(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_age_days: default_max_age_days(),
            secure_cookies: false,
        }
    }
}

impl ProviderConfig {
    /// Returns the timeout applied to token and profile requests.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl GateConfig {
    /// Loads configuration from a JSON file, with environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed, a required field
    /// is absent, or validation fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, config::Environment::with_prefix("FBRP"))
    }

    /// Environment values stay strings until serde asks for a number, so
    /// IDs such as `0123` keep their leading zeros.
    fn load_with_env(path: &Path, env: config::Environment) -> Result<Self, ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Json)
                    .required(true),
            )
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error if `session_secret` is empty, `max_age_days` is
    /// outside `1..=MAX_COOKIE_AGE_DAYS`, or `timeout_seconds` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_secret.is_empty() {
            return Err(ConfigError::Message(
                "session_secret must not be empty".to_string(),
            ));
        }
        if !(1..=MAX_COOKIE_AGE_DAYS).contains(&self.session.max_age_days) {
            return Err(ConfigError::Message(format!(
                "session.max_age_days must be between 1 and {}, got {}",
                MAX_COOKIE_AGE_DAYS, self.session.max_age_days
            )));
        }
        if self.provider.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "provider.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the callback URL registered with the provider.
    #[must_use]
    pub fn redirect_url(&self) -> String {
        format!(
            "{}://{}{}",
            self.provider.redirect_scheme, self.hostname, CALLBACK_ROUTE
        )
    }
}
