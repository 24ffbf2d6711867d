//! Request middleware: sessions, authentication extractors, rate limiting.

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::{OptionalAuth, RequireAdmin, RequireAuth};
