//! HTTP mailer client for a transactional email provider.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde_json::json;

use quill_core::ports::{MailError, Mailer, OutgoingEmail};

/// HTTP mailer configuration.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub api_key: String,
    /// Sender in `Name <address>` form.
    pub from: String,
    pub base_url: String,
}

impl MailerConfig {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            from: from.into(),
            base_url: "https://api.resend.com".to_string(),
        }
    }
}

/// Mailer backed by a transactional email provider's REST API.
pub struct HttpMailer {
    client: Client,
    config: MailerConfig,
}

impl HttpMailer {
    pub fn new(config: MailerConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let response = self
            .client
            .post(format!("{}/emails", self.config.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&json!({
                "from": self.config.from,
                "to": [email.to],
                "subject": email.subject,
                "html": email.html,
            }))
            .send()
            .await
            .map_err(|e| MailError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected(format!("{status}: {body}")));
        }
        Ok(())
    }
}
