//! Admin console pages with the role-filtered sidebar.

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::Router;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use tower_sessions::Session;

use crate::models::SessionUser;
use crate::nav::MenuView;
use crate::state::AppState;

use super::helpers::{
    insert_sidebar, render_not_found, render_template, require_login, site_context,
};

/// Admin entry point.
///
/// GET /admin
/// - Redirects to the first destination the role can see
/// - Renders the No Access panel when there is none
async fn admin_home(State(state): State<AppState>, session: Session) -> Response {
    let user = match require_login(&session).await {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };

    let view = MenuView::for_user(Some(&user), state.navigation().items());
    if let Some(first) = view.items().first() {
        return Redirect::to(first.path).into_response();
    }

    tracing::info!(role = %user.role, "role has no console destinations");
    render_no_access(
        &state,
        &user,
        "/admin",
        "Your role does not have access to any console sections.",
        StatusCode::OK,
    )
}

/// Admin section page.
///
/// GET /admin/{*section}
async fn admin_section(State(state): State<AppState>, session: Session, uri: Uri) -> Response {
    let user = match require_login(&session).await {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };

    let path = uri.path();
    let Some(section) = state.navigation().section_for(path) else {
        return render_not_found();
    };

    let allowed = user.role.role().is_some_and(|role| section.allows(role));
    if !allowed && state.config().enforce_route_access {
        tracing::warn!(
            role = %user.role,
            section = %section.path,
            "direct access to a hidden section denied"
        );
        return render_no_access(
            &state,
            &user,
            path,
            &format!("Your role cannot open {}.", section.name),
            StatusCode::FORBIDDEN,
        );
    }

    let mut context = site_context(&state, Some(&user));
    insert_sidebar(&state, &user, path, &mut context);
    context.insert("section", section);

    render_template(&state, "admin/page.html", &context, StatusCode::OK)
}

fn render_no_access(
    state: &AppState,
    user: &SessionUser,
    path: &str,
    message: &str,
    status: StatusCode,
) -> Response {
    let mut context = site_context(state, Some(user));
    insert_sidebar(state, user, path, &mut context);
    context.insert("message", message);

    render_template(state, "admin/no_access.html", &context, status)
}

/// Create the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_home))
        .route("/admin/{*section}", get(admin_section))
}
