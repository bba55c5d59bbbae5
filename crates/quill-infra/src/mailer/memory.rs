//! In-memory mailer that records instead of sending.

use std::sync::Mutex;

use async_trait::async_trait;

use quill_core::ports::{MailError, Mailer, OutgoingEmail};

/// Mailer that records every message instead of delivering it.
///
/// Fallback when no email provider is configured, and the mailer of choice
/// in tests.
#[derive(Default)]
pub struct InMemoryMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        tracing::debug!(to = %email.to, subject = %email.subject, "recording email send");
        self.sent.lock().expect("sent lock").push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sent_messages() {
        let mailer = InMemoryMailer::new();
        mailer
            .send(OutgoingEmail {
                to: "user@example.com".to_string(),
                subject: "Welcome".to_string(),
                html: "<p>Hi</p>".to_string(),
            })
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "user@example.com");
    }
}
