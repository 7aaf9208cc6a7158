//! Route table and middleware stack.

use axum::{Router, middleware, routing::get};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::auth::{
    self, AppState,
    routes::{CALLBACK_ROUTE, LOGIN_ROUTE, LOGOUT_ROUTE},
};
use crate::pages;

/// Prefix under which the serve root is exposed.
pub const FILES_PREFIX: &str = "/files";

/// Builds the application router.
///
/// `/files` is served from `serve_root` behind [`auth::require_auth`]; every
/// path without its own route falls back to the status page.
pub fn router(state: AppState) -> Router {
    let files = ServiceBuilder::new()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        .service(ServeDir::new(&state.config().serve_root));

    Router::new()
        .route("/", get(pages::index))
        .route(LOGIN_ROUTE, get(auth::login))
        .route(CALLBACK_ROUTE, get(auth::callback))
        .route(LOGOUT_ROUTE, get(auth::logout))
        .nest_service(FILES_PREFIX, files)
        .fallback(pages::index)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
