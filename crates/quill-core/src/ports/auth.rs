//! Admin session port.
//!
//! Credentials live in the content store's auth service; this port covers
//! signing in against it and validating the session token it hands back.

use async_trait::async_trait;

/// Claims carried by a validated session token.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub subject: String,
    pub email: String,
    pub exp: i64,
}

/// Session-based authentication gating the admin routes.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Exchange email/password for a session token.
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// Validate a session token and return its claims.
    fn validate(&self, token: &str) -> Result<SessionClaims, AuthError>;

    /// Lifetime of freshly issued tokens, in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Auth service unreachable: {0}")]
    Connection(String),
}
