//! JSON menu endpoint for script-driven clients.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::nav::{MenuEntry, MenuView, RoleDisplay};
use crate::session::current_user;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct MenuQuery {
    /// Current route, used to flag the active entry.
    #[serde(default)]
    path: String,
}

/// Menu for the current session.
#[derive(Debug, Serialize)]
pub struct MenuResponse {
    /// `hidden`, `no_access` or `items`.
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleDisplay>,
    pub items: Vec<MenuEntry>,
}

/// GET /api/menu?path=/admin/loans
async fn menu(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MenuQuery>,
) -> Json<MenuResponse> {
    let user = current_user(&session).await;
    let view = MenuView::for_user(user.as_ref(), state.navigation().items());

    Json(MenuResponse {
        state: view.state(),
        role: user.as_ref().map(|u| RoleDisplay::for_claim(&u.role)),
        items: view.entries(&query.path),
    })
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/menu", get(menu))
}
