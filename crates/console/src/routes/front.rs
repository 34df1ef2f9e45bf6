//! Front page route handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower_sessions::Session;

use crate::session::current_user;
use crate::state::AppState;

use super::helpers::{render_template, site_context};

/// GET /
async fn front_page(State(state): State<AppState>, session: Session) -> Response {
    let user = current_user(&session).await;
    let context = site_context(&state, user.as_ref());

    render_template(&state, "front.html", &context, StatusCode::OK)
}

/// Create the front page router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(front_page))
}
