#![allow(clippy::unwrap_used, clippy::expect_used)]
//! HTTP auth client tests against an in-process mock of the auth API.

use std::time::Duration;

use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower::ServiceExt;

use canteen_console::auth::{AuthError, AuthProvider, Credentials, HttpAuthProvider};
use canteen_console::models::Role;
use canteen_console::{AppState, Config, build_router};

mod common;
use common::{body_json, extract_cookies};

async fn mock_login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match (body["phone"].as_str(), body["password"].as_str()) {
        (Some("0733000001"), Some("secret")) => (
            StatusCode::OK,
            Json(json!({ "user": { "role": "accountant", "name": "Ama" } })),
        ),
        (Some("0733000001"), _) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Wrong password" })),
        ),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({}))),
    }
}

async fn mock_otp_send(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body["phone"].as_str() {
        Some("0733000429") => (StatusCode::TOO_MANY_REQUESTS, Json(json!({}))),
        Some(_) => (StatusCode::OK, Json(json!({ "sent": true }))),
        None => (StatusCode::BAD_REQUEST, Json(json!({}))),
    }
}

async fn mock_otp_verify(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body["otp"].as_str() {
        Some("2468") => (
            StatusCode::OK,
            Json(json!({ "user": { "role": "volunteer", "phone": body["phone"] } })),
        ),
        Some("5000") => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "database down" })),
        ),
        Some("7777") => (StatusCode::OK, Json(json!({ "ok": true }))),
        _ => (StatusCode::BAD_REQUEST, Json(json!({}))),
    }
}

/// Start the mock auth API; returns its base URL (without a trailing slash).
async fn spawn_mock_api() -> String {
    let router = Router::new()
        .route("/api/auth/login", post(mock_login))
        .route("/api/auth/otp/send", post(mock_otp_send))
        .route("/api/auth/otp/verify", post(mock_otp_verify));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}/api")
}

async fn provider() -> HttpAuthProvider {
    HttpAuthProvider::new(&spawn_mock_api().await, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn password_login_decodes_user() {
    let provider = provider().await;
    let user = provider
        .login(&Credentials {
            phone: "0733000001".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.role.role(), Some(Role::Accountant));
    assert_eq!(user.display_name.as_deref(), Some("Ama"));
}

#[tokio::test]
async fn rejected_login_uses_server_message() {
    let provider = provider().await;
    let err = provider
        .login(&Credentials {
            phone: "0733000001".to_string(),
            password: "guess".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::Rejected("Wrong password".to_string()));
}

#[tokio::test]
async fn rejected_login_without_message_uses_fallback() {
    let provider = provider().await;
    let err = provider
        .login(&Credentials {
            phone: "0799999999".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AuthError::Rejected("Invalid phone number or password.".to_string())
    );
}

#[tokio::test]
async fn wrong_base_path_is_unavailable_not_rejected() {
    let base = format!("{}/wrong", spawn_mock_api().await);
    let provider = HttpAuthProvider::new(&base, Duration::from_secs(5)).unwrap();

    let err = provider
        .login(&Credentials {
            phone: "0733000001".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Unavailable(_)));
    assert!(!err.counts_as_failed_attempt());
}

#[tokio::test]
async fn otp_send_maps_rate_limit_to_throttled() {
    let provider = provider().await;

    provider.send_otp("0733000001").await.unwrap();

    let err = provider.send_otp("0733000429").await.unwrap_err();
    assert!(matches!(err, AuthError::Throttled(_)));
}

#[tokio::test]
async fn otp_verify_keeps_unrecognized_role() {
    let provider = provider().await;
    let user = provider.login_with_otp("0733000002", "2468").await.unwrap();

    assert_eq!(user.role.as_str(), "volunteer");
    assert_eq!(user.role.role(), None);
    assert_eq!(user.phone.as_deref(), Some("0733000002"));
}

#[tokio::test]
async fn server_error_is_unavailable() {
    let provider = provider().await;
    let err = provider
        .login_with_otp("0733000002", "5000")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Unavailable(_)));
    assert!(!err.counts_as_failed_attempt());
}

#[tokio::test]
async fn success_without_user_is_unavailable() {
    let provider = provider().await;
    let err = provider
        .login_with_otp("0733000002", "7777")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Unavailable(_)));
}

#[tokio::test]
async fn console_logs_in_through_http_provider() {
    let config = Config::for_auth_api(spawn_mock_api().await);
    let state = AppState::new(&config).unwrap();
    let router = build_router(state);

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/auth/login")
                .header("content-type", "application/json")
                .body(axum::body::Body::from(
                    json!({ "phone": "0733 000 001", "password": "secret" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookies = extract_cookies(&response);

    let response = router
        .oneshot(
            Request::get("/api/menu")
                .header("cookie", cookies)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["state"], "items");
    assert_eq!(body["role"]["title"], "Accounts Panel");
}
