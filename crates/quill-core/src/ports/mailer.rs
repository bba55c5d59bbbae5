//! Transactional email port.

use async_trait::async_trait;

/// A single outgoing message.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Transactional email service. Callers treat sends as fire-and-forget:
/// a failure is logged and never rolls back the data write it follows.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Email delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Email provider rejected the message: {0}")]
    Rejected(String),

    #[error("Email provider unreachable: {0}")]
    Connection(String),
}
