//! CSRF token generation and verification.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tower_sessions::Session;

/// Session key for storing CSRF tokens.
const CSRF_SESSION_KEY: &str = "csrf_tokens";

/// Maximum number of tokens to keep per session.
const MAX_TOKENS: usize = 10;

/// Token validity period in seconds (1 hour).
const TOKEN_VALIDITY_SECS: i64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    issued_at: i64,
}

impl StoredToken {
    fn is_fresh(&self, now: i64) -> bool {
        now - self.issued_at <= TOKEN_VALIDITY_SECS
    }
}

async fn load(session: &Session) -> Vec<StoredToken> {
    session
        .get(CSRF_SESSION_KEY)
        .await
        .unwrap_or(None)
        .unwrap_or_default()
}

/// Generate a CSRF token and remember it in the session.
pub async fn generate_csrf_token(
    session: &Session,
) -> Result<String, tower_sessions::session::Error> {
    let mut random_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut random_bytes);

    let issued_at = chrono::Utc::now().timestamp();

    let mut hasher = Sha256::new();
    hasher.update(random_bytes);
    hasher.update(issued_at.to_le_bytes());
    let token = hex::encode(hasher.finalize());

    let mut tokens = load(session).await;
    tokens.retain(|t| t.is_fresh(issued_at));
    tokens.push(StoredToken {
        token: token.clone(),
        issued_at,
    });
    if tokens.len() > MAX_TOKENS {
        let skip = tokens.len() - MAX_TOKENS;
        tokens.drain(..skip);
    }

    session.insert(CSRF_SESSION_KEY, tokens).await?;
    Ok(token)
}

/// Verify and consume a submitted token. Tokens are single-use.
pub async fn verify_csrf_token(
    session: &Session,
    submitted: &str,
) -> Result<bool, tower_sessions::session::Error> {
    if submitted.is_empty() {
        return Ok(false);
    }

    let now = chrono::Utc::now().timestamp();
    let mut tokens = load(session).await;

    let Some(index) = tokens
        .iter()
        .position(|t| t.token == submitted && t.is_fresh(now))
    else {
        return Ok(false);
    };

    tokens.remove(index);
    tokens.retain(|t| t.is_fresh(now));
    session.insert(CSRF_SESSION_KEY, tokens).await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_tokens_are_not_fresh() {
        let token = StoredToken {
            token: "abc".to_string(),
            issued_at: 1_000,
        };
        assert!(token.is_fresh(1_000 + TOKEN_VALIDITY_SECS));
        assert!(!token.is_fresh(1_001 + TOKEN_VALIDITY_SECS));
    }

    #[test]
    fn token_format_is_hex_sha256() {
        let token = hex::encode(Sha256::digest(b"canteen"));
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
