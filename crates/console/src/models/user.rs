//! Session user model.

use serde::{Deserialize, Serialize};

use super::role::RoleClaim;

/// The authenticated user held in the session.
///
/// Created from the auth API's response on login and dropped on logout or
/// session expiry. Request handlers only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub role: RoleClaim,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl SessionUser {
    /// Create a session user with only a role.
    pub fn new(role: impl Into<RoleClaim>) -> Self {
        Self {
            role: role.into(),
            display_name: None,
            phone: None,
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Name to greet the user with: display name, then masked phone, then role.
    pub fn label(&self) -> String {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_string();
        }
        if let Some(phone) = self.phone.as_deref() {
            return mask_phone(phone);
        }
        self.role.to_string()
    }
}

/// Mask a phone number for display and logs, keeping the last four digits.
pub fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 4 {
        return "*".repeat(digits.len());
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("{}{tail}", "*".repeat(digits.len() - 4))
}
