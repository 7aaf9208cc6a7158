//! Signed cookie session store.
//!
//! The session lives entirely in one cookie whose value is the JSON form of
//! [`SessionData`], signed with a key derived from `session_secret`. A cookie
//! that fails verification or decoding yields an empty (logged out) session.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, Key, SameSite, SignedCookieJar};
use fbrp_access::SessionData;
use sha2::{Digest, Sha512};
use std::convert::Infallible;
use std::sync::Arc;
use time::Duration as TimeDuration;

use super::AppState;
use crate::config::GateConfig;

/// Derives the cookie signing key from the configured secret.
///
/// The secret may have any non-empty length; SHA-512 stretches it to the
/// 64 bytes the cookie key requires.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// The current request's session.
///
/// Extracting a `Session` never fails. Changes are only persisted when the
/// jar returned by [`Session::save`] is part of the response.
pub struct Session {
    jar: SignedCookieJar,
    data: SessionData,
    config: Arc<GateConfig>,
}

impl Session {
    /// Returns true if this browser completed a successful login.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.data.has_auth()
    }

    /// Sets the authenticated flag.
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.data.set_has_auth(authenticated);
    }

    /// Returns a jar that writes the signed session cookie.
    #[must_use]
    pub fn save(self) -> SignedCookieJar {
        let settings = &self.config.session;
        let cookie = Cookie::build((settings.cookie_name.clone(), self.data.encode()))
            .path("/")
            .http_only(true)
            .secure(settings.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(TimeDuration::days(settings.max_age_days));

        self.jar.add(cookie)
    }
}

impl<S> FromRequestParts<S> for Session
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let config = app_state.shared_config();
        let jar = SignedCookieJar::from_headers(&parts.headers, app_state.cookie_key().clone());
        let name = config.session.cookie_name.as_str();

        let data = match jar.get(name) {
            Some(cookie) => SessionData::decode(cookie.value()).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "undecodable session cookie, treating as logged out");
                SessionData::default()
            }),
            None => {
                if CookieJar::from_headers(&parts.headers).get(name).is_some() {
                    tracing::warn!("session cookie failed verification, treating as logged out");
                }
                SessionData::default()
            }
        };

        Ok(Self { jar, data, config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_secret_derives_same_key() {
        let a = signing_key("sekrit");
        let b = signing_key("sekrit");
        assert_eq!(a.master(), b.master());
    }

    #[test]
    fn different_secrets_derive_different_keys() {
        assert_ne!(signing_key("one").master(), signing_key("two").master());
    }

    #[test]
    fn short_secret_still_yields_a_key() {
        assert_eq!(signing_key("x").master().len(), 64);
    }
}
