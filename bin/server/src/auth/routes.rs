//! Authentication routes for login, callback, and logout.

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::{AppState, Session};

/// Starts the provider login.
pub const LOGIN_ROUTE: &str = "/auth/login";

/// Where the provider sends the browser back with a code.
pub const CALLBACK_ROUTE: &str = "/auth/login/facebook/callback";

/// Clears the session flag.
pub const LOGOUT_ROUTE: &str = "/auth/logout";

/// Opaque state value sent with the authorization request.
const LOGIN_STATE: &str = "login";

/// Query parameters for the OAuth callback.
///
/// The provider sends `code` on success and `error` (plus a description)
/// when the user declines.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Builds a `301 Moved Permanently` response.
pub(crate) fn moved_permanently(location: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

/// Redirects to the identity provider's authorization page.
pub async fn login(State(state): State<AppState>) -> Response {
    let auth_url = state.oauth_client().authorization_url(LOGIN_STATE);
    moved_permanently(auth_url.as_str())
}

/// Completes the login: exchanges the code, checks group membership, and
/// records the outcome in the session before redirecting home.
///
/// A query string that does not parse (for example a repeated `code`) counts
/// as a failed login.
pub async fn callback(
    State(state): State<AppState>,
    query: Result<Query<CallbackQuery>, QueryRejection>,
    mut session: Session,
) -> Response {
    let allowed = match query {
        Ok(Query(query)) => authorize(&state, &query).await,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "unreadable callback query");
            false
        }
    };
    session.set_authenticated(allowed);

    (session.save(), moved_permanently("/")).into_response()
}

/// Logs out by clearing the session flag.
pub async fn logout(mut session: Session) -> Response {
    session.set_authenticated(false);
    (session.save(), moved_permanently("/")).into_response()
}

/// Returns true if the callback proves membership in the secret group.
///
/// A failed exchange stops here; the profile is never requested without a
/// token.
async fn authorize(state: &AppState, query: &CallbackQuery) -> bool {
    if let Some(error) = &query.error {
        tracing::warn!(
            error = %error,
            description = query.error_description.as_deref().unwrap_or_default(),
            "provider returned an error to the callback"
        );
        return false;
    }

    let code = query.code.as_deref().unwrap_or_default();
    let token = match state.oauth_client().exchange(code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            return false;
        }
    };

    match state.group_checker().verify_member(&token).await {
        Ok(member) => {
            tracing::info!(
                name = member.name().unwrap_or("unknown"),
                user_id = member.id().unwrap_or("unknown"),
                "login"
            );
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "login refused");
            false
        }
    }
}
