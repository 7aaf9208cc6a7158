//! The status page.
//!
//! A single page reports the login state and an optional message, with
//! links to log in, log out, and browse the files.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

use crate::auth::{AppState, Session};

const STATUS_TEMPLATE: &str = "status";

const STATUS_PAGE: &str = r#"<html>
<head></head>
<body>
<p>Message: {{message}}</p>
<p>Logged in? {{#if logged_in}}yes!{{else}}No!{{/if}}</p>
<ul>
<li><a href="/auth/login">login</a></li>
<li><a href="/auth/logout">logout</a></li>
<li><a href="/files/">files</a></li>
</ul>
</body>
</html>
"#;

#[derive(Serialize)]
struct StatusContext<'a> {
    message: &'a str,
    logged_in: bool,
}

/// Compiled page templates.
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    /// Compiles the templates.
    ///
    /// # Errors
    ///
    /// Returns an error if a template does not parse.
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(STATUS_TEMPLATE, STATUS_PAGE)?;
        Ok(Self { registry })
    }

    /// Renders the status page. `message` is HTML-escaped.
    pub fn render_status(&self, message: &str, logged_in: bool) -> Result<String, RenderError> {
        self.registry.render(
            STATUS_TEMPLATE,
            &StatusContext { message, logged_in },
        )
    }

    /// Renders the status page as a response with the given status code.
    pub fn status_response(&self, status: StatusCode, message: &str, logged_in: bool) -> Response {
        match self.render_status(message, logged_in) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to render status page");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Shows the status page for the current session.
pub async fn index(State(state): State<AppState>, session: Session) -> Response {
    state
        .pages()
        .status_response(StatusCode::OK, "", session.is_authenticated())
}
