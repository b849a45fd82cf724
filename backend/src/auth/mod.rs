//! Authentication module
//!
//! Bearer-token session resolution. Tokens are HS256 JWTs carrying the
//! caller's user id and role; there is no login flow in this service.

mod jwt;

pub use jwt::{generate_access_token, verify_token, Claims, JwtError, UserRole};

/// Token verification settings shared with request extractors
#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}
