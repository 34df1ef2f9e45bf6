//! Session provider: talks to the external auth API.
//!
//! [`AuthProvider`] is the seam; [`HttpAuthProvider`] is the production
//! implementation and tests script their own.

mod http;
mod provider;

pub use http::HttpAuthProvider;
pub use provider::{
    AuthError, AuthProvider, Credentials, normalize_phone, validate_credentials, validate_otp,
};
