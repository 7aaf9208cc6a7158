//! Domain error types for the server process.
//!
//! Request-time failures are handled where they occur (see
//! [`crate::auth::oauth::OAuthError`] and [`fbrp_access::MembershipError`]);
//! this module covers failures that stop the process.

use std::fmt;

/// Errors that prevent the server from starting or keep it from serving.
#[derive(Debug)]
pub enum ServerError {
    /// Configuration is unreadable or invalid.
    Config { details: String },
    /// The outbound HTTP client could not be built.
    HttpClient { details: String },
    /// The OAuth client could not be configured.
    OAuth { details: String },
    /// The page template failed to compile.
    Template { details: String },
    /// The listening socket could not be bound.
    Bind { addr: String, details: String },
    /// The serve loop exited with an error.
    Serve { details: String },
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "invalid configuration: {}", details),
            Self::HttpClient { details } => {
                write!(f, "failed to build HTTP client: {}", details)
            }
            Self::OAuth { details } => write!(f, "failed to set up OAuth client: {}", details),
            Self::Template { details } => {
                write!(f, "failed to compile page template: {}", details)
            }
            Self::Bind { addr, details } => {
                write!(f, "failed to bind to {}: {}", addr, details)
            }
            Self::Serve { details } => write!(f, "server error: {}", details),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<config::ConfigError> for ServerError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config {
            details: err.to_string(),
        }
    }
}
