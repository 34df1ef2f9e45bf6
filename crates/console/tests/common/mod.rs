#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Every test builds its own [`TestApp`] around the real router and state.
//! Only the auth API is replaced, by a [`ScriptedAuthProvider`], so the
//! session, CSRF, lockout and template layers all run for real.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use canteen_console::models::SessionUser;
use canteen_console::nav::PermissionTable;
use canteen_console::{AppState, Config, build_router};
use canteen_test_utils::ScriptedAuthProvider;

/// Password every scripted account uses.
pub const PASSWORD: &str = "correct-horse";

/// Test application wrapper using the real routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub auth: Arc<ScriptedAuthProvider>,
}

impl TestApp {
    /// App with the default test configuration.
    pub fn new(auth: ScriptedAuthProvider) -> Self {
        Self::with_config(Config::for_auth_api("http://auth.invalid/api/"), auth)
    }

    /// App with an explicit configuration.
    pub fn with_config(config: Config, auth: ScriptedAuthProvider) -> Self {
        let auth = Arc::new(auth);
        let navigation = PermissionTable::builtin().expect("built-in table is valid");
        let state = AppState::with_parts(config, auth.clone(), navigation)
            .expect("Failed to initialize AppState");
        let router = build_router(state.clone());

        Self {
            router,
            state,
            auth,
        }
    }

    /// App with one password account per `(phone, user)` pair.
    pub fn with_accounts(accounts: &[(&str, SessionUser)]) -> Self {
        let auth = accounts
            .iter()
            .fold(ScriptedAuthProvider::new(), |auth, (phone, user)| {
                auth.with_account(phone, PASSWORD, user.clone())
            });
        Self::new(auth)
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// Send a request with cookies from a previous response.
    pub async fn request_with_cookies(
        &self,
        mut request: Request<Body>,
        cookies: &str,
    ) -> Response {
        if !cookies.is_empty() {
            request.headers_mut().insert(
                header::COOKIE,
                cookies.parse().expect("Invalid cookie header"),
            );
        }
        self.request(request).await
    }

    pub async fn get(&self, uri: &str, cookies: &str) -> Response {
        self.request_with_cookies(Request::get(uri).body(Body::empty()).unwrap(), cookies)
            .await
    }

    pub async fn post_form(&self, uri: &str, cookies: &str, fields: &[(&str, &str)]) -> Response {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();

        self.request_with_cookies(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
            cookies,
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, cookies: &str, body: &Value) -> Response {
        self.request_with_cookies(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            cookies,
        )
        .await
    }

    /// Login via JSON API and return the session cookies.
    ///
    /// # Panics
    ///
    /// Panics if the login response is not 200 OK.
    pub async fn login(&self, phone: &str) -> String {
        self.state.lockout().clear_all(phone);

        let response = self
            .post_json(
                "/api/auth/login",
                "",
                &serde_json::json!({ "phone": phone, "password": PASSWORD }),
            )
            .await;

        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Login failed for phone '{phone}' (status {})",
            response.status()
        );

        extract_cookies(&response)
    }

    /// Fetch the login page; returns (cookies, csrf token).
    pub async fn login_page(&self, uri: &str) -> (String, String) {
        let response = self.get(uri, "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookies = extract_cookies(&response);
        let html = body_string(response).await;
        (cookies, extract_csrf_token(&html))
    }
}

/// Extract session cookies from a response.
pub fn extract_cookies(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Cookies after `response`: any newly set cookie replaces the old jar.
pub fn next_cookies(previous: &str, response: &Response) -> String {
    let fresh = extract_cookies(response);
    if fresh.is_empty() {
        previous.to_string()
    } else {
        fresh
    }
}

/// Pull the hidden `_token` value out of a rendered form.
pub fn extract_csrf_token(html: &str) -> String {
    let marker = r#"name="_token" value=""#;
    let start = html.find(marker).expect("form has no CSRF token") + marker.len();
    let end = html[start..].find('"').expect("unterminated token value");
    html[start..start + end].to_string()
}

/// `Location` header of a redirect.
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response has no Location header")
        .to_str()
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
