//! Campus Canteen console.
//!
//! Login flow (phone/password or one-time code, against an external auth
//! API) and an admin area whose sidebar is filtered by the user's role.
//! The `canteen` binary serves it.

pub mod auth;
pub mod config;
pub mod error;
pub mod form;
pub mod lockout;
pub mod models;
pub mod nav;
pub mod routes;
pub mod session;
pub mod state;
pub mod theme;

pub use config::Config;
pub use routes::build_router;
pub use state::AppState;
