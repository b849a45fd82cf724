//! HTTP middleware
//!
//! Request tracing and caller authentication.

pub mod auth;
mod tracing;

pub use auth::{AdminUser, AuthenticatedUser, OptionalUser};
pub use self::tracing::{request_tracing, REQUEST_ID_HEADER};
