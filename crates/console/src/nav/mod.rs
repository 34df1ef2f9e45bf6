//! Admin navigation.
//!
//! - [`PermissionTable`]: static, ordered list of destinations and the roles
//!   allowed to see each
//! - [`resolve_menu`] / [`MenuView`]: the visible menu for a session
//! - [`RoleDisplay`]: panel title and badge for a role
//! - [`is_active`]: active-item highlighting
//!
//! Everything here is a pure function of its inputs.

mod active;
mod display;
mod filter;
mod table;

pub use active::is_active;
pub use display::{
    BadgeStyle, FALLBACK_TITLE, RoleDisplay, badge_style, panel_title, role_badge, role_title,
};
pub use filter::{MenuEntry, MenuView, resolve_menu};
pub use table::{ADMIN_NAVIGATION, NavigationItem, PermissionTable, TableError};
