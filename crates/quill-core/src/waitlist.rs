//! Waitlist signup flow.
//!
//! Validation happens before any network call; a duplicate email is a
//! friendly outcome, not an error; the welcome email is best-effort and
//! never fails the overall request.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{EmailError, WaitlistSignup};
use crate::error::StoreError;
use crate::ports::{Mailer, OutgoingEmail, WaitlistStore};

/// What happened to a valid submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitlistOutcome {
    /// First time - stored and welcome email attempted.
    Joined,
    /// The store reported a uniqueness violation for this email.
    AlreadyJoined,
}

/// Waitlist submission failures.
#[derive(Debug, Error)]
pub enum WaitlistError {
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error("Waitlist store failed: {0}")]
    Store(StoreError),
}

/// The waitlist signup service.
pub struct WaitlistService {
    store: Arc<dyn WaitlistStore>,
    mailer: Arc<dyn Mailer>,
    platform: String,
}

impl WaitlistService {
    pub fn new(store: Arc<dyn WaitlistStore>, mailer: Arc<dyn Mailer>, platform: &str) -> Self {
        Self {
            store,
            mailer,
            platform: platform.to_string(),
        }
    }

    /// Validate, normalize, store, then best-effort send the welcome email.
    pub async fn join(&self, raw_email: &str) -> Result<WaitlistOutcome, WaitlistError> {
        let signup = WaitlistSignup::parse(raw_email, &self.platform)?;

        match self.store.insert(&signup).await {
            Ok(()) => {}
            Err(e) if e.is_constraint() => return Ok(WaitlistOutcome::AlreadyJoined),
            Err(e) => return Err(WaitlistError::Store(e)),
        }

        // The record is saved; an email failure must not fail the request.
        let email = OutgoingEmail {
            to: signup.email.clone(),
            subject: "You're on the Quill Android Waitlist! 🚀".to_string(),
            html: welcome_email_html(),
        };
        if let Err(e) = self.mailer.send(email).await {
            tracing::error!(email = %signup.email, error = %e, "welcome email failed to send");
        }

        Ok(WaitlistOutcome::Joined)
    }
}

/// Inline-styled HTML body for the welcome email.
pub fn welcome_email_html() -> String {
    r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; color: #111;">
    <h1 style="font-size: 24px; font-weight: bold; margin-bottom: 20px;">Welcome to the inner circle!</h1>
    <p style="font-size: 16px; line-height: 1.5; margin-bottom: 20px;">
        Thanks for joining the waitlist for Quill on Android. We're working hard to bring the same premium study experience to the Play Store.
    </p>
    <p style="font-size: 16px; line-height: 1.5; margin-bottom: 20px;">
        As an early supporter, you'll be among the first to know when we launch, and we might even have a special surprise waiting for you on Day 1.
    </p>
    <p style="font-size: 16px; line-height: 1.5; margin-bottom: 30px;">
        Stay tuned, <br />
        The Quill Team
    </p>
    <hr style="border: 0; border-top: 1px solid #eee; margin-bottom: 20px;" />
    <p style="font-size: 12px; color: #666;">
        © 2026 Quill. All rights reserved.
    </p>
</div>"#
        .to_string()
}
