//! HTTP client for the external auth API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::models::{SessionUser, mask_phone};

use super::provider::{AuthError, AuthProvider, Credentials};

const LOGIN_ENDPOINT: &str = "auth/login";
const OTP_SEND_ENDPOINT: &str = "auth/otp/send";
const OTP_VERIFY_ENDPOINT: &str = "auth/otp/verify";

const UNREACHABLE_MESSAGE: &str =
    "Unable to reach the authentication service. Please try again.";
const BAD_RESPONSE_MESSAGE: &str = "Unexpected response from the authentication service.";

/// Successful login/verify body.
#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: SessionUser,
}

/// Error body: `{ "message": "..." }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    phone: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct OtpSendBody<'a> {
    phone: &'a str,
}

#[derive(Serialize)]
struct OtpVerifyBody<'a> {
    phone: &'a str,
    otp: &'a str,
}

/// [`AuthProvider`] backed by the auth API over HTTP.
#[derive(Clone)]
pub struct HttpAuthProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpAuthProvider {
    /// Create a provider for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url).context("AUTH_API_URL is not a valid URL")?;
        // Url::join replaces the last segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build auth API client")?;

        Ok(Self { client, base_url })
    }

    /// Absolute URL of an endpoint.
    pub fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base_url.join(path).map_err(|e| {
            warn!(error = %e, endpoint = %path, "failed to build auth API URL");
            AuthError::Unavailable(UNREACHABLE_MESSAGE.to_string())
        })
    }

    /// POST a JSON body; non-2xx answers are mapped to [`AuthError`].
    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        rejected_fallback: &str,
    ) -> Result<reqwest::Response, AuthError> {
        let url = self.endpoint(endpoint)?;

        let response = self.client.post(url).json(body).send().await.map_err(|e| {
            warn!(error = %e, endpoint = %endpoint, "auth API request failed");
            AuthError::Unavailable(UNREACHABLE_MESSAGE.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text);
        debug!(status = %status, endpoint = %endpoint, "auth API returned an error");

        Err(classify_failure(status, message, rejected_fallback))
    }

    async fn read_user(response: reqwest::Response) -> Result<SessionUser, AuthError> {
        response
            .json::<UserEnvelope>()
            .await
            .map(|envelope| envelope.user)
            .map_err(|e| {
                warn!(error = %e, "auth API returned an unreadable user");
                AuthError::Unavailable(BAD_RESPONSE_MESSAGE.to_string())
            })
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn login(&self, credentials: &Credentials) -> Result<SessionUser, AuthError> {
        let body = LoginBody {
            phone: &credentials.phone,
            password: &credentials.password,
        };
        let response = self
            .post(LOGIN_ENDPOINT, &body, "Invalid phone number or password.")
            .await?;
        let user = Self::read_user(response).await?;

        info!(phone = %mask_phone(&credentials.phone), role = %user.role, "password login accepted");
        Ok(user)
    }

    async fn send_otp(&self, phone: &str) -> Result<(), AuthError> {
        self.post(
            OTP_SEND_ENDPOINT,
            &OtpSendBody { phone },
            "Could not send a verification code to this number.",
        )
        .await?;

        info!(phone = %mask_phone(phone), "verification code requested");
        Ok(())
    }

    async fn login_with_otp(&self, phone: &str, code: &str) -> Result<SessionUser, AuthError> {
        let response = self
            .post(
                OTP_VERIFY_ENDPOINT,
                &OtpVerifyBody { phone, otp: code },
                "Invalid or expired verification code.",
            )
            .await?;
        let user = Self::read_user(response).await?;

        info!(phone = %mask_phone(phone), role = %user.role, "code login accepted");
        Ok(user)
    }
}

/// Extract the `message` field from an error body, if there is one.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

/// Map a non-success status to an error class.
fn classify_failure(
    status: StatusCode,
    message: Option<String>,
    rejected_fallback: &str,
) -> AuthError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return AuthError::Throttled(
            message.unwrap_or_else(|| "Too many attempts. Please wait and try again.".to_string()),
        );
    }
    // A bare 404/405 means the base URL is wrong.
    if message.is_none()
        && (status == StatusCode::NOT_FOUND || status == StatusCode::METHOD_NOT_ALLOWED)
    {
        return AuthError::Unavailable(UNREACHABLE_MESSAGE.to_string());
    }
    if status.is_client_error() {
        return AuthError::Rejected(message.unwrap_or_else(|| rejected_fallback.to_string()));
    }
    AuthError::Unavailable(message.unwrap_or_else(|| UNREACHABLE_MESSAGE.to_string()))
}
