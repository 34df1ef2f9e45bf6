//! Role-based menu resolution.

use serde::Serialize;

use crate::models::{RoleClaim, SessionUser};

use super::active::is_active;
use super::table::NavigationItem;

/// Items visible to `role`, in table order.
///
/// No role (no session) yields nothing. An unrecognized role matches no
/// item, since tables only list known roles.
pub fn resolve_menu<'a>(
    role: Option<&RoleClaim>,
    table: &'a [NavigationItem],
) -> Vec<&'a NavigationItem> {
    let Some(role) = role.and_then(RoleClaim::role) else {
        return Vec::new();
    };

    table.iter().filter(|item| item.allows(role)).collect()
}

/// What the sidebar should show for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuView<'a> {
    /// No authenticated session: render no sidebar navigation.
    Hidden,
    /// Authenticated, but the role reaches no destination.
    NoAccess,
    /// The visible items, in display order. Never empty.
    Items(Vec<&'a NavigationItem>),
}

impl<'a> MenuView<'a> {
    /// Resolve the view for the session's user.
    pub fn for_user(user: Option<&SessionUser>, table: &'a [NavigationItem]) -> Self {
        let Some(user) = user else {
            return MenuView::Hidden;
        };

        let items = resolve_menu(Some(&user.role), table);
        if items.is_empty() {
            MenuView::NoAccess
        } else {
            MenuView::Items(items)
        }
    }

    /// Visible items; empty unless [`MenuView::Items`].
    pub fn items(&self) -> &[&'a NavigationItem] {
        match self {
            MenuView::Items(items) => items,
            MenuView::Hidden | MenuView::NoAccess => &[],
        }
    }

    /// Stable identifier of the view kind, used by templates and the JSON API.
    pub fn state(&self) -> &'static str {
        match self {
            MenuView::Hidden => "hidden",
            MenuView::NoAccess => "no_access",
            MenuView::Items(_) => "items",
        }
    }

    /// Render-ready entries with the active flag set for `current_path`.
    pub fn entries(&self, current_path: &str) -> Vec<MenuEntry> {
        self.items()
            .iter()
            .map(|item| MenuEntry {
                name: item.name,
                path: item.path,
                icon: item.icon,
                active: is_active(current_path, item.path),
            })
            .collect()
    }
}

/// A sidebar entry as handed to templates and API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub name: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
    pub active: bool,
}
