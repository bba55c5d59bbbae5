//! Session provider backed by the content store's auth service.
//!
//! Sign-in exchanges credentials with the hosted auth endpoint; validation
//! stays local by verifying the token against the project's JWT secret, so
//! every admin request does not cost a network round trip.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use quill_core::ports::{AuthError, SessionClaims, SessionProvider};

/// Remote auth configuration.
#[derive(Debug, Clone)]
pub struct RemoteAuthConfig {
    /// Project base URL, without a trailing slash.
    pub base_url: String,
    /// Public api key sent with auth requests.
    pub api_key: String,
    /// Secret the auth service signs access tokens with.
    pub jwt_secret: String,
}

impl RemoteAuthConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        jwt_secret: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            api_key: api_key.into(),
            jwt_secret: jwt_secret.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Claims as the auth service encodes them.
#[derive(Debug, Deserialize)]
struct RemoteClaims {
    sub: String,
    #[serde(default)]
    email: String,
    exp: i64,
}

/// Session provider backed by the hosted auth service.
pub struct RemoteSessions {
    client: Client,
    decoding_key: DecodingKey,
    config: RemoteAuthConfig,
}

impl RemoteSessions {
    pub fn new(config: RemoteAuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        Self {
            client: Client::new(),
            decoding_key,
            config,
        }
    }
}

#[async_trait]
impl SessionProvider for RemoteSessions {
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let url = format!(
            "{}/auth/v1/token?grant_type=password",
            self.config.base_url
        );
        let response = self
            .client
            .post(url)
            .header("apikey", &self.config.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let token: TokenResponse = response
                    .json()
                    .await
                    .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
                Ok(token.access_token)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthError::InvalidCredentials)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AuthError::Connection(format!("{status}: {body}")))
            }
        }
    }

    fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Audience varies by auth backend role; expiry is what matters here.
        validation.validate_aud = false;

        let token_data = decode::<RemoteClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            },
        )?;

        Ok(SessionClaims {
            subject: token_data.claims.sub,
            email: token_data.claims.email,
            exp: token_data.claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        email: String,
        exp: i64,
    }

    fn provider() -> RemoteSessions {
        RemoteSessions::new(RemoteAuthConfig::new(
            "https://project.example.co",
            "anon-key",
            "jwt-secret",
        ))
    }

    fn signed(secret: &str, exp: i64) -> String {
        let claims = TestClaims {
            sub: "user-1".to_string(),
            email: "admin@test.com".to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn validate_accepts_a_token_signed_with_the_project_secret() {
        let exp = (Utc::now() + TimeDelta::hours(1)).timestamp();
        let claims = provider().validate(&signed("jwt-secret", exp)).unwrap();
        assert_eq!(claims.subject, "user-1");
        assert_eq!(claims.email, "admin@test.com");
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn validate_rejects_a_foreign_signature() {
        let exp = (Utc::now() + TimeDelta::hours(1)).timestamp();
        let result = provider().validate(&signed("other-secret", exp));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn validate_rejects_an_expired_token() {
        let exp = (Utc::now() - TimeDelta::hours(1)).timestamp();
        let result = provider().validate(&signed("jwt-secret", exp));
        assert!(matches!(result, Err(AuthError::SessionExpired)));
    }
}
