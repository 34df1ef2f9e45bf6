//! Canteen console test utilities.
//!
//! Fixtures for session users and navigation tables, and a scripted
//! [`AuthProvider`] that answers like the external auth API without any
//! network traffic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use canteen_console::auth::{AuthError, AuthProvider, Credentials};
use canteen_console::models::{Role, RoleClaim, SessionUser};
use canteen_console::nav::NavigationItem;

/// Create a session user for a known role.
pub fn test_user(role: Role) -> SessionUser {
    SessionUser::new(role).with_display_name(format!("Test {role}"))
}

/// Create a session user whose role string is outside the known set.
pub fn unrecognized_user(raw_role: &str) -> SessionUser {
    SessionUser::new(RoleClaim::parse(raw_role))
}

/// Build a navigation item for table tests.
pub fn nav_item(
    name: &'static str,
    path: &'static str,
    allowed_roles: &'static [Role],
) -> NavigationItem {
    NavigationItem {
        name,
        path,
        icon: "dot",
        allowed_roles,
    }
}

/// The three-item table used by the menu scenarios: Home, Users, Loans.
pub fn scenario_table() -> Vec<NavigationItem> {
    vec![
        nav_item(
            "Home",
            "/admin/home",
            &[Role::Admin, Role::President, Role::Accountant],
        ),
        nav_item("Users", "/admin/users", &[Role::Admin]),
        nav_item("Loans", "/admin/loans", &[Role::Admin, Role::Accountant]),
    ]
}

/// A call received by [`ScriptedAuthProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCall {
    Login { phone: String },
    SendOtp { phone: String },
    LoginWithOtp { phone: String, code: String },
}

struct Account {
    password: String,
    user: SessionUser,
}

/// In-memory stand-in for the auth API.
#[derive(Default)]
pub struct ScriptedAuthProvider {
    accounts: Mutex<HashMap<String, Account>>,
    issued_codes: Mutex<HashMap<String, String>>,
    fixed_code: Mutex<Option<String>>,
    unavailable: AtomicBool,
    calls: Mutex<Vec<AuthCall>>,
}

impl ScriptedAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account reachable by password and OTP.
    pub fn with_account(self, phone: &str, password: &str, user: SessionUser) -> Self {
        self.accounts.lock().insert(
            phone.to_string(),
            Account {
                password: password.to_string(),
                user,
            },
        );
        self
    }

    /// Code issued by every `send_otp` call (default: "123456").
    pub fn with_otp_code(self, code: &str) -> Self {
        *self.fixed_code.lock() = Some(code.to_string());
        self
    }

    /// Simulate the auth API being unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<AuthCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: AuthCall) {
        self.calls.lock().push(call);
    }

    fn check_available(&self) -> Result<(), AuthError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::Unavailable(
                "Unable to reach the authentication service. Please try again.".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for ScriptedAuthProvider {
    async fn login(&self, credentials: &Credentials) -> Result<SessionUser, AuthError> {
        self.record(AuthCall::Login {
            phone: credentials.phone.clone(),
        });
        self.check_available()?;

        let accounts = self.accounts.lock();
        match accounts.get(&credentials.phone) {
            Some(account) if account.password == credentials.password => Ok(account.user.clone()),
            _ => Err(AuthError::Rejected(
                "Invalid phone number or password.".to_string(),
            )),
        }
    }

    async fn send_otp(&self, phone: &str) -> Result<(), AuthError> {
        self.record(AuthCall::SendOtp {
            phone: phone.to_string(),
        });
        self.check_available()?;

        if !self.accounts.lock().contains_key(phone) {
            return Err(AuthError::Rejected(
                "No account is registered for this number.".to_string(),
            ));
        }

        let code = self
            .fixed_code
            .lock()
            .clone()
            .unwrap_or_else(|| "123456".to_string());
        self.issued_codes.lock().insert(phone.to_string(), code);
        Ok(())
    }

    async fn login_with_otp(&self, phone: &str, code: &str) -> Result<SessionUser, AuthError> {
        self.record(AuthCall::LoginWithOtp {
            phone: phone.to_string(),
            code: code.to_string(),
        });
        self.check_available()?;

        let issued = self.issued_codes.lock().get(phone).cloned();
        if issued.as_deref() != Some(code) {
            return Err(AuthError::Rejected(
                "Invalid or expired verification code.".to_string(),
            ));
        }

        self.issued_codes.lock().remove(phone);
        self.accounts
            .lock()
            .get(phone)
            .map(|a| a.user.clone())
            .ok_or_else(|| AuthError::Rejected("Invalid or expired verification code.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_table_has_three_items() {
        let table = scenario_table();
        let names: Vec<_> = table.iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Home", "Users", "Loans"]);
    }

    #[test]
    fn unrecognized_user_keeps_raw_role() {
        let user = unrecognized_user("volunteer");
        assert_eq!(user.role.as_str(), "volunteer");
        assert!(user.role.role().is_none());
    }
}
