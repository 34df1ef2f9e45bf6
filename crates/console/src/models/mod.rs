//! Data models.

pub mod role;
pub mod user;

pub use role::{Role, RoleClaim, UnknownRole};
pub use user::{SessionUser, mask_phone};
