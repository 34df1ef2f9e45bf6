//! Shared route helpers for page rendering.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tower_sessions::Session;

use crate::models::SessionUser;
use crate::nav::{MenuView, RoleDisplay};
use crate::session::current_user;
use crate::state::AppState;

/// Require an authenticated user, or redirect to login.
pub async fn require_login(session: &Session) -> Result<SessionUser, Response> {
    current_user(session)
        .await
        .ok_or_else(|| Redirect::to("/user/login").into_response())
}

/// Base template context: `site_name`, `user_authenticated`.
pub fn site_context(state: &AppState, user: Option<&SessionUser>) -> tera::Context {
    let mut context = tera::Context::new();
    context.insert("site_name", &state.config().site_name);
    context.insert("user_authenticated", &user.is_some());
    context
}

/// Add the sidebar variables for `user` at `path`.
///
/// Adds: `menu_state`, `entries`, `role_display`, `user_label`, `path`.
pub fn insert_sidebar(
    state: &AppState,
    user: &SessionUser,
    path: &str,
    context: &mut tera::Context,
) {
    let view = MenuView::for_user(Some(user), state.navigation().items());

    context.insert("menu_state", view.state());
    context.insert("entries", &view.entries(path));
    context.insert("role_display", &RoleDisplay::for_claim(&user.role));
    context.insert("user_label", &user.label());
    context.insert("path", path);
}

/// Render a template, falling back to a plain error page.
pub fn render_template(
    state: &AppState,
    template: &str,
    context: &tera::Context,
    status: StatusCode,
) -> Response {
    match state.theme().render(template, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, template = %template, "failed to render template");
            render_server_error("The page could not be rendered.")
        }
    }
}

/// Plain 404 page.
pub fn render_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            r#"<!DOCTYPE html>
<html><head><title>Not found</title></head>
<body><h1>Page not found</h1><p><a href="/admin">Back to the console</a></p></body></html>"#
                .to_string(),
        ),
    )
        .into_response()
}

/// Plain 500 page.
pub fn render_server_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(format!(
            r#"<!DOCTYPE html>
<html><head><title>Error</title></head>
<body><h1>Something went wrong</h1><p>{}</p></body></html>"#,
            html_escape(message)
        )),
    )
        .into_response()
}

/// HTML-escape a string for safe output.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
