//! Role presentation: panel titles and badge styles.
//!
//! The two lookups are independent. Known roles go through exhaustive
//! matches; unrecognized roles get [`FALLBACK_TITLE`] and
//! [`BadgeStyle::Neutral`].

use serde::Serialize;

use crate::models::{Role, RoleClaim};

/// Title used when a role has no entry of its own.
pub const FALLBACK_TITLE: &str = "Admin Panel";

/// Badge color classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    Red,
    Purple,
    Indigo,
    Blue,
    Green,
    Emerald,
    Yellow,
    Pink,
    Orange,
    Teal,
    Cyan,
    Neutral,
}

impl BadgeStyle {
    /// CSS class applied to the badge element.
    pub fn css_class(self) -> &'static str {
        match self {
            BadgeStyle::Red => "badge badge-red",
            BadgeStyle::Purple => "badge badge-purple",
            BadgeStyle::Indigo => "badge badge-indigo",
            BadgeStyle::Blue => "badge badge-blue",
            BadgeStyle::Green => "badge badge-green",
            BadgeStyle::Emerald => "badge badge-emerald",
            BadgeStyle::Yellow => "badge badge-yellow",
            BadgeStyle::Pink => "badge badge-pink",
            BadgeStyle::Orange => "badge badge-orange",
            BadgeStyle::Teal => "badge badge-teal",
            BadgeStyle::Cyan => "badge badge-cyan",
            BadgeStyle::Neutral => "badge badge-neutral",
        }
    }
}

/// Sidebar heading for a known role.
pub fn role_title(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin Panel",
        Role::President => "President's Panel",
        Role::VicePresident => "Vice President's Panel",
        Role::Accountant => "Accounts Panel",
        Role::Secretary => "Secretary Panel",
        Role::Finance => "Finance Panel",
        Role::Member => "Member Panel",
        Role::Music => "Music Panel",
        Role::Education => "Education Panel",
        Role::Maintenance => "Maintenance Panel",
        Role::Youth => "Youth Panel",
        Role::Audit => "Audit Panel",
    }
}

/// Badge style for a known role.
pub fn role_badge(role: Role) -> BadgeStyle {
    match role {
        Role::Admin => BadgeStyle::Red,
        Role::President => BadgeStyle::Purple,
        Role::VicePresident => BadgeStyle::Indigo,
        Role::Accountant => BadgeStyle::Green,
        Role::Secretary => BadgeStyle::Blue,
        Role::Finance => BadgeStyle::Emerald,
        Role::Member => BadgeStyle::Neutral,
        Role::Music => BadgeStyle::Pink,
        Role::Education => BadgeStyle::Yellow,
        Role::Maintenance => BadgeStyle::Orange,
        Role::Youth => BadgeStyle::Cyan,
        Role::Audit => BadgeStyle::Teal,
    }
}

/// Panel title for any claimed role.
pub fn panel_title(claim: &RoleClaim) -> &'static str {
    claim.role().map(role_title).unwrap_or(FALLBACK_TITLE)
}

/// Badge style for any claimed role.
pub fn badge_style(claim: &RoleClaim) -> BadgeStyle {
    claim.role().map(role_badge).unwrap_or(BadgeStyle::Neutral)
}

/// Everything the sidebar header needs about a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDisplay {
    pub role: String,
    pub title: &'static str,
    pub badge: BadgeStyle,
    pub badge_class: &'static str,
}

impl RoleDisplay {
    pub fn for_claim(claim: &RoleClaim) -> Self {
        let badge = badge_style(claim);
        Self {
            role: claim.to_string(),
            title: panel_title(claim),
            badge,
            badge_class: badge.css_class(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_role_has_non_empty_title_and_badge() {
        for role in Role::ALL {
            let claim = RoleClaim::from(role);
            assert!(!panel_title(&claim).is_empty(), "{role}");
            assert!(!badge_style(&claim).css_class().is_empty(), "{role}");
        }
    }

    #[test]
    fn unrecognized_role_uses_both_fallbacks() {
        let claim = RoleClaim::parse("volunteer");
        assert_eq!(panel_title(&claim), "Admin Panel");
        assert_eq!(badge_style(&claim), BadgeStyle::Neutral);
    }

    #[test]
    fn empty_role_string_still_gets_title_and_badge() {
        let claim = RoleClaim::parse("");
        assert_eq!(panel_title(&claim), FALLBACK_TITLE);
        assert_eq!(badge_style(&claim).css_class(), "badge badge-neutral");
    }

    #[test]
    fn known_role_lookups() {
        assert_eq!(role_title(Role::Finance), "Finance Panel");
        assert_eq!(role_badge(Role::Admin), BadgeStyle::Red);
    }

    #[test]
    fn role_display_bundles_both_lookups() {
        let display = RoleDisplay::for_claim(&RoleClaim::from(Role::Secretary));
        assert_eq!(display.role, "secretary");
        assert_eq!(display.title, "Secretary Panel");
        assert_eq!(display.badge, BadgeStyle::Blue);
        assert_eq!(display.badge_class, "badge badge-blue");
    }
}
