//! Session provider contract.

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::models::SessionUser;

/// Phone/password login credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub phone: String,
    pub password: String,
}

/// Failures surfaced by an [`AuthProvider`].
///
/// Every variant carries the message shown to the user; all of them are
/// recoverable by trying again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The auth service rejected the credentials or code.
    #[error("{0}")]
    Rejected(String),

    /// The request never produced a usable answer (network, timeout, 5xx).
    #[error("{0}")]
    Unavailable(String),

    /// The submitted input was malformed; nothing was sent.
    #[error("{0}")]
    Invalid(String),

    /// Too many recent failures for this phone number.
    #[error("{0}")]
    Throttled(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Rejected(_) => StatusCode::UNAUTHORIZED,
            AuthError::Unavailable(_) => StatusCode::BAD_GATEWAY,
            AuthError::Invalid(_) => StatusCode::BAD_REQUEST,
            AuthError::Throttled(_) => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Message for inline display.
    pub fn message(&self) -> &str {
        match self {
            AuthError::Rejected(msg)
            | AuthError::Unavailable(msg)
            | AuthError::Invalid(msg)
            | AuthError::Throttled(msg) => msg,
        }
    }

    /// Whether this failure should count toward the login throttle.
    pub fn counts_as_failed_attempt(&self) -> bool {
        matches!(self, AuthError::Rejected(_))
    }
}

/// External authentication service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Log in with phone and password.
    async fn login(&self, credentials: &Credentials) -> Result<SessionUser, AuthError>;

    /// Ask the service to send a one-time password to `phone`.
    async fn send_otp(&self, phone: &str) -> Result<(), AuthError>;

    /// Log in with a one-time password previously sent to `phone`.
    async fn login_with_otp(&self, phone: &str, code: &str) -> Result<SessionUser, AuthError>;
}

/// Normalize and validate a phone number.
///
/// Spaces, dashes, dots and parentheses are dropped; a single leading `+` is
/// kept. The result must hold 7 to 15 digits.
pub fn normalize_phone(raw: &str) -> Result<String, AuthError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AuthError::Invalid("Phone number is required.".to_string()));
    }

    let (plus, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", trimmed),
    };

    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => {
                return Err(AuthError::Invalid(
                    "Phone number may only contain digits.".to_string(),
                ));
            }
        }
    }

    if !(7..=15).contains(&digits.len()) {
        return Err(AuthError::Invalid(
            "Phone number must have between 7 and 15 digits.".to_string(),
        ));
    }

    Ok(format!("{plus}{digits}"))
}

/// Validate a one-time password: 4 to 8 digits.
pub fn validate_otp(raw: &str) -> Result<String, AuthError> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(AuthError::Invalid("Verification code is required.".to_string()));
    }
    if !(4..=8).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(AuthError::Invalid(
            "Verification code must be 4 to 8 digits.".to_string(),
        ));
    }
    Ok(code.to_string())
}

/// Validate credentials, returning them with a normalized phone number.
pub fn validate_credentials(credentials: &Credentials) -> Result<Credentials, AuthError> {
    let phone = normalize_phone(&credentials.phone)?;
    if credentials.password.is_empty() {
        return Err(AuthError::Invalid("Password is required.".to_string()));
    }
    Ok(Credentials {
        phone,
        password: credentials.password.clone(),
    })
}
