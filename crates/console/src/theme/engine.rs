//! Theme engine backed by Tera templates.

use std::path::Path;

use anyhow::{Context, Result};
use tera::Tera;
use tracing::debug;

/// Templates compiled into the binary, used unless a directory override is set.
const BUNDLED_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("front.html", include_str!("../../templates/front.html")),
    ("user/login.html", include_str!("../../templates/user/login.html")),
    ("admin/sidebar.html", include_str!("../../templates/admin/sidebar.html")),
    ("admin/page.html", include_str!("../../templates/admin/page.html")),
    ("admin/no_access.html", include_str!("../../templates/admin/no_access.html")),
];

/// Theme engine for rendering pages.
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Load templates from a directory (`**/*.html`).
    pub fn new(template_dir: &Path) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;

        let count = tera.get_template_names().count();
        debug!(count, dir = %template_dir.display(), "loaded templates");

        Ok(Self { tera })
    }

    /// Load the templates compiled into the binary.
    pub fn bundled() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUNDLED_TEMPLATES.to_vec())
            .context("failed to parse bundled templates")?;

        debug!(count = BUNDLED_TEMPLATES.len(), "loaded bundled templates");
        Ok(Self { tera })
    }

    /// Directory override when given, bundled templates otherwise.
    pub fn from_config(template_dir: Option<&Path>) -> Result<Self> {
        match template_dir {
            Some(dir) => Self::new(dir),
            None => Self::bundled(),
        }
    }

    /// Render a template by name.
    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, tera::Error> {
        self.tera.render(template, context)
    }

    /// Whether a template with this name is loaded.
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|t| t == name)
    }
}
