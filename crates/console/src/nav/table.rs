//! Permission table: which roles may see which admin destinations.
//!
//! The table is ordered; its order is the sidebar's display order.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::models::Role;

use super::active::is_active;

/// A single admin navigation destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    /// Display label, unique within a table.
    pub name: &'static str,
    /// Route path, unique within a table.
    pub path: &'static str,
    /// Symbolic icon identifier, rendered as an `icon-<name>` class.
    pub icon: &'static str,
    /// Roles allowed to see this destination. Never empty.
    pub allowed_roles: &'static [Role],
}

impl NavigationItem {
    /// Whether `role` may see this item.
    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }
}

/// Rejected table definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("navigation item '{0}' has no allowed roles")]
    NoRoles(String),

    #[error("duplicate navigation path: {0}")]
    DuplicatePath(String),

    #[error("duplicate navigation name: {0}")]
    DuplicateName(String),

    #[error("navigation path must start with '/': {0}")]
    RelativePath(String),
}

/// Validated, ordered permission table.
#[derive(Debug, Clone)]
pub struct PermissionTable {
    items: Vec<NavigationItem>,
}

impl PermissionTable {
    /// Validate and wrap a list of items, preserving their order.
    pub fn new(items: Vec<NavigationItem>) -> Result<Self, TableError> {
        let mut paths = HashSet::new();
        let mut names = HashSet::new();

        for item in &items {
            if item.allowed_roles.is_empty() {
                return Err(TableError::NoRoles(item.name.to_string()));
            }
            if !item.path.starts_with('/') {
                return Err(TableError::RelativePath(item.path.to_string()));
            }
            if !paths.insert(item.path) {
                return Err(TableError::DuplicatePath(item.path.to_string()));
            }
            if !names.insert(item.name) {
                return Err(TableError::DuplicateName(item.name.to_string()));
            }
        }

        Ok(Self { items })
    }

    /// The console's built-in table.
    pub fn builtin() -> Result<Self, TableError> {
        Self::new(ADMIN_NAVIGATION.to_vec())
    }

    /// All items in display order.
    pub fn items(&self) -> &[NavigationItem] {
        &self.items
    }

    /// Find the item a request path falls under.
    ///
    /// When several items match (nested paths), the deepest one wins.
    pub fn section_for(&self, current_path: &str) -> Option<&NavigationItem> {
        self.items
            .iter()
            .filter(|item| is_active(current_path, item.path))
            .max_by_key(|item| item.path.len())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

use Role::*;

const STAFF: &[Role] = &[
    Admin,
    President,
    VicePresident,
    Accountant,
    Secretary,
    Finance,
    Music,
    Education,
    Maintenance,
    Youth,
    Audit,
];

/// Admin sidebar destinations. `Member` deliberately appears nowhere.
pub static ADMIN_NAVIGATION: &[NavigationItem] = &[
    NavigationItem {
        name: "Dashboard",
        path: "/admin/dashboard",
        icon: "home",
        allowed_roles: STAFF,
    },
    NavigationItem {
        name: "Users",
        path: "/admin/users",
        icon: "users",
        allowed_roles: &[Admin],
    },
    NavigationItem {
        name: "Members",
        path: "/admin/members",
        icon: "id-card",
        allowed_roles: &[Admin, President, VicePresident, Secretary],
    },
    NavigationItem {
        name: "Orders",
        path: "/admin/orders",
        icon: "shopping-bag",
        allowed_roles: &[Admin, Accountant, Finance],
    },
    NavigationItem {
        name: "Contributions",
        path: "/admin/contributions",
        icon: "wallet",
        allowed_roles: &[Admin, President, Accountant, Finance, Audit],
    },
    NavigationItem {
        name: "Loans",
        path: "/admin/loans",
        icon: "hand-coins",
        allowed_roles: &[Admin, Accountant, Finance],
    },
    NavigationItem {
        name: "Expenses",
        path: "/admin/expenses",
        icon: "receipt",
        allowed_roles: &[Admin, Accountant, Finance, Audit],
    },
    NavigationItem {
        name: "Reports",
        path: "/admin/reports",
        icon: "chart",
        allowed_roles: &[Admin, President, VicePresident, Accountant, Finance, Audit],
    },
    NavigationItem {
        name: "Announcements",
        path: "/admin/announcements",
        icon: "megaphone",
        allowed_roles: &[Admin, President, VicePresident, Secretary],
    },
    NavigationItem {
        name: "Events",
        path: "/admin/events",
        icon: "calendar",
        allowed_roles: &[Admin, Secretary, Music, Education, Youth],
    },
    NavigationItem {
        name: "Music",
        path: "/admin/music",
        icon: "music",
        allowed_roles: &[Admin, Music],
    },
    NavigationItem {
        name: "Education",
        path: "/admin/education",
        icon: "book",
        allowed_roles: &[Admin, Education],
    },
    NavigationItem {
        name: "Maintenance",
        path: "/admin/maintenance",
        icon: "wrench",
        allowed_roles: &[Admin, Maintenance],
    },
    NavigationItem {
        name: "Youth",
        path: "/admin/youth",
        icon: "sparkles",
        allowed_roles: &[Admin, Youth],
    },
    NavigationItem {
        name: "Audit Log",
        path: "/admin/audit",
        icon: "shield",
        allowed_roles: &[Admin, Audit],
    },
    NavigationItem {
        name: "QR Codes",
        path: "/admin/qr-codes",
        icon: "qr-code",
        allowed_roles: &[Admin, Secretary],
    },
    NavigationItem {
        name: "Settings",
        path: "/admin/settings",
        icon: "settings",
        allowed_roles: &[Admin],
    },
];
