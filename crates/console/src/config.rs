//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Base URL of the external auth API.
    pub auth_api_url: String,

    /// Timeout for auth API requests (default: 10 seconds).
    pub auth_api_timeout: Duration,

    /// Template directory override. When None, bundled templates are used.
    pub templates_dir: Option<PathBuf>,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Cookie SameSite policy: "strict", "lax", or "none" (default: "strict").
    pub cookie_same_site: String,

    /// Whether the session cookie carries the Secure flag (default: true).
    pub cookie_secure: bool,

    /// Session inactivity expiry in hours (default: 24).
    pub session_expiry_hours: i64,

    /// Deny direct requests to admin sections the role cannot see (default: true).
    pub enforce_route_access: bool,

    /// Site name shown in page titles.
    pub site_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let auth_api_url =
            env::var("AUTH_API_URL").context("AUTH_API_URL environment variable is required")?;

        let auth_api_timeout = env::var("AUTH_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map(Duration::from_secs)
            .context("AUTH_API_TIMEOUT_SECS must be a valid u64")?;

        let templates_dir = env::var("TEMPLATES_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let cookie_same_site = env::var("COOKIE_SAME_SITE")
            .unwrap_or_else(|_| "strict".to_string())
            .to_lowercase();

        let cookie_secure = parse_bool("COOKIE_SECURE", true)?;

        let session_expiry_hours = env::var("SESSION_EXPIRY_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .context("SESSION_EXPIRY_HOURS must be a valid i64")?;

        let enforce_route_access = parse_bool("ENFORCE_ROUTE_ACCESS", true)?;

        let site_name = env::var("SITE_NAME").unwrap_or_else(|_| "Campus Canteen".to_string());

        Ok(Self {
            port,
            auth_api_url,
            auth_api_timeout,
            templates_dir,
            cors_allowed_origins,
            cookie_same_site,
            cookie_secure,
            session_expiry_hours,
            enforce_route_access,
            site_name,
        })
    }

    /// Configuration for tests and local tooling: no environment lookups.
    pub fn for_auth_api(auth_api_url: impl Into<String>) -> Self {
        Self {
            port: 3000,
            auth_api_url: auth_api_url.into(),
            auth_api_timeout: Duration::from_secs(10),
            templates_dir: None,
            cors_allowed_origins: vec!["*".to_string()],
            cookie_same_site: "strict".to_string(),
            cookie_secure: false,
            session_expiry_hours: 24,
            enforce_route_access: true,
            site_name: "Campus Canteen".to_string(),
        }
    }
}

fn parse_bool(key: &str, default: bool) -> Result<bool> {
    match env::var(key) {
        Ok(v) => match v.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("{key} must be a boolean, got '{other}'"),
        },
        Err(_) => Ok(default),
    }
}
