//! Self-contained session provider for local development.
//!
//! Checks credentials against a single admin account from the environment
//! and issues its own HS256 session tokens.

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use quill_core::ports::{AuthError, SessionClaims, SessionProvider};

/// Local session configuration.
#[derive(Debug, Clone)]
pub struct LocalAuthConfig {
    pub admin_email: String,
    pub admin_password: String,
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for LocalAuthConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@example.com".to_string(),
            admin_password: "change-me-in-production".to_string(),
            secret: "change-me-in-production".to_string(),
            expiration_hours: 24,
            issuer: "quill-site".to_string(),
        }
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    exp: i64, // expiration timestamp
    iat: i64, // issued at
    iss: String,
}

/// Session provider that validates one fixed admin account and signs its
/// own tokens. The fallback when no auth backend is configured.
pub struct LocalSessions {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: LocalAuthConfig,
}

impl LocalSessions {
    pub fn new(config: LocalAuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    pub fn from_env() -> Self {
        let secret = std::env::var("SESSION_SECRET")
            .unwrap_or_else(|_| "change-me-in-production".to_string());
        if secret == "change-me-in-production" {
            tracing::warn!("Using default session secret. Set SESSION_SECRET for production use.");
        }

        let config = LocalAuthConfig {
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".to_string()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "change-me-in-production".to_string()),
            secret,
            expiration_hours: std::env::var("SESSION_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24),
            issuer: "quill-site".to_string(),
        };
        Self::new(config)
    }

    fn issue_token(&self, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: "admin".to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[async_trait]
impl SessionProvider for LocalSessions {
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError> {
        if email != self.config.admin_email || password != self.config.admin_password {
            return Err(AuthError::InvalidCredentials);
        }
        self.issue_token(email)
    }

    fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        Ok(SessionClaims {
            subject: token_data.claims.sub,
            email: token_data.claims.email,
            exp: token_data.claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> LocalAuthConfig {
        LocalAuthConfig {
            admin_email: "admin@test.com".to_string(),
            admin_password: "hunter2".to_string(),
            secret: "test-secret-key".to_string(),
            expiration_hours: 1,
            issuer: "test-issuer".to_string(),
        }
    }

    #[tokio::test]
    async fn sign_in_with_valid_credentials_issues_a_token() {
        let sessions = LocalSessions::new(test_config());

        let token = sessions.sign_in("admin@test.com", "hunter2").await.unwrap();
        assert!(!token.is_empty());

        let claims = sessions.validate(&token).unwrap();
        assert_eq!(claims.subject, "admin");
        assert_eq!(claims.email, "admin@test.com");
    }

    #[tokio::test]
    async fn sign_in_with_wrong_password_is_rejected() {
        let sessions = LocalSessions::new(test_config());
        let result = sessions.sign_in("admin@test.com", "wrong").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn validate_garbage_token_is_rejected() {
        let sessions = LocalSessions::new(test_config());
        let result = sessions.validate("invalid-token");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn validate_rejects_a_foreign_issuer() {
        let signer = LocalSessions::new(LocalAuthConfig {
            issuer: "other-issuer".to_string(),
            ..test_config()
        });
        let verifier = LocalSessions::new(test_config());

        let token = signer.sign_in("admin@test.com", "hunter2").await.unwrap();
        assert!(verifier.validate(&token).is_err());
    }

    #[test]
    fn expiration_seconds_tracks_config() {
        let sessions = LocalSessions::new(LocalAuthConfig {
            expiration_hours: 24,
            ..test_config()
        });
        assert_eq!(sessions.expiration_seconds(), 86400);
    }
}
