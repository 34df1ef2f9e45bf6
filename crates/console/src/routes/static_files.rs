//! Static asset serving.
//!
//! The console ships a single stylesheet, compiled into the binary.

use axum::Router;
use axum::extract::Path;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use crate::state::AppState;

const ASSETS: &[(&str, &str, &str)] = &[(
    "console.css",
    "text/css",
    include_str!("../../static/console.css"),
)];

/// Serve a bundled asset.
async fn serve_static(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');

    match ASSETS.iter().find(|(name, _, _)| *name == path) {
        Some((_, content_type, body)) => (
            [
                (header::CONTENT_TYPE, *content_type),
                (header::CACHE_CONTROL, "public, max-age=86400"),
            ],
            *body,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Create the static files router.
pub fn router() -> Router<AppState> {
    Router::new().route("/static/{*path}", get(serve_static))
}
