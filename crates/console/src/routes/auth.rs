//! Authentication routes: password login, OTP login, logout.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, warn};

use crate::auth::{AuthError, Credentials, normalize_phone, validate_credentials, validate_otp};
use crate::error::AppResult;
use crate::form::{generate_csrf_token, verify_csrf_token};
use crate::lockout::lockout_message;
use crate::models::{SessionUser, mask_phone};
use crate::session::{self, current_user};
use crate::state::AppState;

use super::helpers::{render_server_error, render_template, site_context};

/// Which login form to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMode {
    Password,
    Otp,
}

impl LoginMode {
    fn as_str(self) -> &'static str {
        match self {
            LoginMode::Password => "password",
            LoginMode::Otp => "otp",
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginQuery {
    mode: Option<LoginMode>,
}

/// Form-based password login.
#[derive(Debug, Deserialize)]
pub struct LoginFormRequest {
    pub phone: String,
    pub password: String,
    #[serde(rename = "_token", default)]
    pub csrf_token: String,
}

/// Form-based OTP request.
#[derive(Debug, Deserialize)]
pub struct OtpSendFormRequest {
    pub phone: String,
    #[serde(rename = "_token", default)]
    pub csrf_token: String,
}

/// Form-based OTP verification.
#[derive(Debug, Deserialize)]
pub struct OtpVerifyFormRequest {
    pub phone: String,
    pub code: String,
    #[serde(rename = "_token", default)]
    pub csrf_token: String,
}

/// JSON OTP request.
#[derive(Debug, Deserialize)]
pub struct OtpSendRequest {
    pub phone: String,
}

/// JSON OTP verification.
#[derive(Debug, Deserialize)]
pub struct OtpVerifyRequest {
    pub phone: String,
    pub code: String,
}

/// JSON auth response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

/// What the login page should show.
struct LoginPage<'a> {
    mode: LoginMode,
    phone: &'a str,
    otp_sent: bool,
    error: Option<&'a str>,
    notice: Option<&'a str>,
    status: StatusCode,
}

impl<'a> LoginPage<'a> {
    fn new(mode: LoginMode) -> Self {
        Self {
            mode,
            phone: "",
            otp_sent: false,
            error: None,
            notice: None,
            status: StatusCode::OK,
        }
    }

    fn failed(mode: LoginMode, phone: &'a str, error: &'a AuthError) -> Self {
        Self {
            error: Some(error.message()),
            status: error.status_code(),
            phone,
            ..Self::new(mode)
        }
    }
}

async fn render_login(state: &AppState, session: &Session, page: LoginPage<'_>) -> Response {
    let csrf_token = match generate_csrf_token(session).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "failed to generate CSRF token");
            return render_server_error("The login form is temporarily unavailable.");
        }
    };

    let mut context = site_context(state, None);
    context.insert("csrf_token", &csrf_token);
    context.insert("mode", page.mode.as_str());
    context.insert("phone", page.phone);
    context.insert("otp_sent", &page.otp_sent);
    if let Some(error) = page.error {
        context.insert("error", error);
    }
    if let Some(notice) = page.notice {
        context.insert("notice", notice);
    }

    render_template(state, "user/login.html", &context, page.status)
}

/// Login form.
///
/// GET /user/login?mode=password|otp
async fn login_form(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LoginQuery>,
) -> Response {
    if current_user(&session).await.is_some() {
        return Redirect::to("/admin").into_response();
    }

    let mode = query.mode.unwrap_or(LoginMode::Password);
    render_login(&state, &session, LoginPage::new(mode)).await
}

fn invalid_token() -> AuthError {
    AuthError::Invalid("Invalid form token. Please try again.".to_string())
}

async fn check_csrf(session: &Session, token: &str) -> Result<(), AuthError> {
    match verify_csrf_token(session, token).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(invalid_token()),
        Err(e) => {
            tracing::error!(error = %e, "failed to verify CSRF token");
            Err(invalid_token())
        }
    }
}

/// Password login form handler.
///
/// POST /user/login
async fn login_form_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginFormRequest>,
) -> Response {
    let result = match check_csrf(&session, &form.csrf_token).await {
        Ok(()) => {
            let credentials = Credentials {
                phone: form.phone.clone(),
                password: form.password,
            };
            do_password_login(&state, &session, &credentials).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => Redirect::to("/admin").into_response(),
        Err(e) => {
            render_login(
                &state,
                &session,
                LoginPage::failed(LoginMode::Password, &form.phone, &e),
            )
            .await
        }
    }
}

/// OTP request form handler.
///
/// POST /user/login/otp/send
async fn otp_send_form_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OtpSendFormRequest>,
) -> Response {
    let result = match check_csrf(&session, &form.csrf_token).await {
        Ok(()) => do_send_otp(&state, &form.phone).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(phone) => {
            let notice = format!("A verification code was sent to {}.", mask_phone(&phone));
            let page = LoginPage {
                phone: &phone,
                otp_sent: true,
                notice: Some(&notice),
                ..LoginPage::new(LoginMode::Otp)
            };
            render_login(&state, &session, page).await
        }
        Err(e) => {
            render_login(
                &state,
                &session,
                LoginPage::failed(LoginMode::Otp, &form.phone, &e),
            )
            .await
        }
    }
}

/// OTP verification form handler.
///
/// POST /user/login/otp/verify
async fn otp_verify_form_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OtpVerifyFormRequest>,
) -> Response {
    let result = match check_csrf(&session, &form.csrf_token).await {
        Ok(()) => do_otp_login(&state, &session, &form.phone, &form.code).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => Redirect::to("/admin").into_response(),
        Err(e) => {
            let page = LoginPage {
                otp_sent: true,
                ..LoginPage::failed(LoginMode::Otp, &form.phone, &e)
            };
            render_login(&state, &session, page).await
        }
    }
}

/// Fail fast when the phone is locked out.
fn ensure_not_locked(state: &AppState, phone: &str) -> Result<(), AuthError> {
    let lockout = state.lockout();
    if lockout.is_locked(phone) {
        return Err(AuthError::Throttled(lockout_message(
            lockout.lockout_remaining(phone),
        )));
    }
    Ok(())
}

/// Count a rejection toward the lockout; may upgrade it to `Throttled`.
fn note_failure(state: &AppState, phone: &str, error: AuthError) -> AuthError {
    if !error.counts_as_failed_attempt() {
        return error;
    }

    let (locked, remaining) = state.lockout().record_failed_attempt(phone);
    if locked {
        return AuthError::Throttled(lockout_message(state.lockout().lockout_remaining(phone)));
    }
    warn!(phone = %mask_phone(phone), remaining, "login rejected");
    error
}

async fn start_session(
    state: &AppState,
    session: &Session,
    phone: &str,
    mut user: SessionUser,
) -> Result<SessionUser, AuthError> {
    state.lockout().clear_attempts(phone);

    if user.phone.is_none() {
        user.phone = Some(phone.to_string());
    }

    session::store_user(session, &user).await.map_err(|e| {
        tracing::error!(error = %e, "failed to store user in session");
        AuthError::Unavailable("Could not start your session. Please try again.".to_string())
    })?;

    info!(phone = %mask_phone(phone), role = %user.role, "user logged in");
    Ok(user)
}

/// Validate, check the throttle, call the auth API and start the session.
async fn do_password_login(
    state: &AppState,
    session: &Session,
    credentials: &Credentials,
) -> Result<SessionUser, AuthError> {
    let credentials = validate_credentials(credentials)?;
    ensure_not_locked(state, &credentials.phone)?;

    match state.auth().login(&credentials).await {
        Ok(user) => start_session(state, session, &credentials.phone, user).await,
        Err(e) => Err(note_failure(state, &credentials.phone, e)),
    }
}

/// Returns the normalized phone the code was sent to.
async fn do_send_otp(state: &AppState, phone: &str) -> Result<String, AuthError> {
    let phone = normalize_phone(phone)?;
    ensure_not_locked(state, &phone)?;

    state.auth().send_otp(&phone).await?;
    Ok(phone)
}

async fn do_otp_login(
    state: &AppState,
    session: &Session,
    phone: &str,
    code: &str,
) -> Result<SessionUser, AuthError> {
    let phone = normalize_phone(phone)?;
    let code = validate_otp(code)?;
    ensure_not_locked(state, &phone)?;

    match state.auth().login_with_otp(&phone, &code).await {
        Ok(user) => start_session(state, session, &phone, user).await,
        Err(e) => Err(note_failure(state, &phone, e)),
    }
}

/// JSON password login.
///
/// POST /api/auth/login
async fn login_json(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<Credentials>,
) -> AppResult<Json<AuthResponse>> {
    let user = do_password_login(&state, &session, &credentials).await?;
    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        user: Some(user),
    }))
}

/// JSON OTP request.
///
/// POST /api/auth/otp/send
async fn otp_send_json(
    State(state): State<AppState>,
    Json(request): Json<OtpSendRequest>,
) -> AppResult<Json<AuthResponse>> {
    let phone = do_send_otp(&state, &request.phone).await?;
    Ok(Json(AuthResponse {
        success: true,
        message: format!("A verification code was sent to {}.", mask_phone(&phone)),
        user: None,
    }))
}

/// JSON OTP login.
///
/// POST /api/auth/otp/verify
async fn otp_verify_json(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<OtpVerifyRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = do_otp_login(&state, &session, &request.phone, &request.code).await?;
    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        user: Some(user),
    }))
}

/// Logout handler.
///
/// GET /user/logout
async fn logout(session: Session) -> Response {
    if let Some(user) = current_user(&session).await {
        info!(role = %user.role, "user logged out");
    }

    if let Err(e) = session::clear(&session).await {
        tracing::error!(error = %e, "failed to clear session");
    }

    Redirect::to("/user/login").into_response()
}

/// JSON logout.
///
/// POST /api/auth/logout
async fn logout_json(session: Session) -> AppResult<Json<AuthResponse>> {
    session::clear(&session).await?;
    Ok(Json(AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
        user: None,
    }))
}

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/login", get(login_form).post(login_form_submit))
        .route("/user/login/otp/send", post(otp_send_form_submit))
        .route("/user/login/otp/verify", post(otp_verify_form_submit))
        .route("/user/logout", get(logout))
        .route("/api/auth/login", post(login_json))
        .route("/api/auth/otp/send", post(otp_send_json))
        .route("/api/auth/otp/verify", post(otp_verify_json))
        .route("/api/auth/logout", post(logout_json))
}
