//! HTTP route handlers.

pub mod admin;
pub mod api;
pub mod auth;
pub mod front;
pub mod health;
pub mod helpers;
pub mod static_files;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::session::create_session_layer;
use crate::state::AppState;

/// Build the full application router with session and trace layers.
pub fn build_router(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .merge(front::router())
        .merge(auth::router())
        .merge(admin::router())
        .merge(api::router())
        .merge(health::router())
        .merge(static_files::router())
        // Middleware layers (last added = first executed in request flow):
        // TraceLayer → session → routes
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
