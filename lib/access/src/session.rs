//! Session data stored in the signed session cookie.
//!
//! The cookie value is the JSON encoding of [`SessionData`]. Signing and
//! verification happen in the server; this module only deals with the
//! payload.

use serde::{Deserialize, Serialize};

/// The key-value bag associated with a browser session.
///
/// Only one flag is tracked: whether the browser completed a login whose
/// group check passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    has_auth: bool,
}

impl SessionData {
    /// Returns true if the session has authenticated.
    #[must_use]
    pub fn has_auth(&self) -> bool {
        self.has_auth
    }

    /// Sets the authenticated flag.
    pub fn set_has_auth(&mut self, has_auth: bool) {
        self.has_auth = has_auth;
    }

    /// Encodes the data as a cookie value.
    #[must_use]
    pub fn encode(&self) -> String {
        // A struct holding one bool always serializes.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    /// Decodes a cookie value.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the value is not a valid encoding.
    pub fn decode(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }
}
