//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::auth::{AuthProvider, HttpAuthProvider};
use crate::config::Config;
use crate::lockout::LockoutService;
use crate::nav::PermissionTable;
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap. Everything inside is
/// read-only after startup apart from the lockout counters.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Loaded configuration.
    config: Config,

    /// Session provider toward the external auth API.
    auth: Arc<dyn AuthProvider>,

    /// Navigation permission table.
    navigation: PermissionTable,

    /// Theme engine for template rendering.
    theme: ThemeEngine,

    /// Failed login tracking.
    lockout: LockoutService,
}

impl AppState {
    /// Create application state with the HTTP auth provider.
    pub fn new(config: &Config) -> Result<Self> {
        let auth = HttpAuthProvider::new(&config.auth_api_url, config.auth_api_timeout)
            .context("failed to create auth API client")?;

        let navigation =
            PermissionTable::builtin().context("built-in navigation table is invalid")?;

        Self::with_parts(config.clone(), Arc::new(auth), navigation)
    }

    /// Create application state from explicit parts.
    pub fn with_parts(
        config: Config,
        auth: Arc<dyn AuthProvider>,
        navigation: PermissionTable,
    ) -> Result<Self> {
        let theme = ThemeEngine::from_config(config.templates_dir.as_deref())
            .context("failed to load templates")?;

        info!(
            navigation_items = navigation.len(),
            enforce_route_access = config.enforce_route_access,
            "application state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                navigation,
                theme,
                lockout: LockoutService::new(),
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn auth(&self) -> &dyn AuthProvider {
        self.inner.auth.as_ref()
    }

    pub fn navigation(&self) -> &PermissionTable {
        &self.inner.navigation
    }

    pub fn theme(&self) -> &ThemeEngine {
        &self.inner.theme
    }

    pub fn lockout(&self) -> &LockoutService {
        &self.inner.lockout
    }
}
