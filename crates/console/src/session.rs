//! Session management.
//!
//! The authenticated [`SessionUser`] lives in a server-side session store;
//! the browser only holds the session id cookie.

use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::Config;
use crate::models::SessionUser;

/// Session key for the authenticated user.
pub const SESSION_USER: &str = "user";

/// Default session expiry (24 hours).
pub const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 24;

/// Map the configured SameSite string; anything unknown is strict.
pub fn same_site(policy: &str) -> SameSite {
    match policy {
        "lax" => SameSite::Lax,
        "none" => SameSite::None,
        _ => SameSite::Strict,
    }
}

/// Create the session layer backed by the in-process store.
pub fn create_session_layer(config: &Config) -> SessionManagerLayer<MemoryStore> {
    let hours = if config.session_expiry_hours > 0 {
        config.session_expiry_hours
    } else {
        DEFAULT_SESSION_EXPIRY_HOURS
    };

    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.cookie_secure)
        .with_http_only(true)
        .with_same_site(same_site(&config.cookie_same_site))
        .with_expiry(Expiry::OnInactivity(Duration::hours(hours)))
}

/// The logged-in user, if any. Store failures read as "not logged in".
pub async fn current_user(session: &Session) -> Option<SessionUser> {
    match session.get::<SessionUser>(SESSION_USER).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read user from session");
            None
        }
    }
}

/// Start an authenticated session for `user`.
///
/// The session id is cycled first so a pre-login id cannot be reused.
pub async fn store_user(
    session: &Session,
    user: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(SESSION_USER, user).await
}

/// End the session entirely.
pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_site_defaults_to_strict() {
        assert_eq!(same_site("lax"), SameSite::Lax);
        assert_eq!(same_site("none"), SameSite::None);
        assert_eq!(same_site("strict"), SameSite::Strict);
        assert_eq!(same_site("bogus"), SameSite::Strict);
    }
}
