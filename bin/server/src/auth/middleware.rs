//! Authentication middleware for Axum.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use super::{AppState, Session};

/// Message shown when a protected route is requested without a login.
pub const NOT_LOGGED_IN: &str = "You're not logged in, login first";

/// Lets the request through only if the session is authenticated.
///
/// Otherwise responds 403 with the status page; the inner service is not
/// called.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    if session.is_authenticated() {
        return next.run(request).await;
    }

    tracing::debug!(path = %request.uri().path(), "denied unauthenticated request");
    state
        .pages()
        .status_response(StatusCode::FORBIDDEN, NOT_LOGGED_IN, false)
}
