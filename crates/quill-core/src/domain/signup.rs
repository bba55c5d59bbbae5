use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RFC 5322, simplified.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex compiles")
});

const MAX_EMAIL_LEN: usize = 254;

/// Email validation failures, rejected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email is required")]
    Missing,

    #[error("Email is too long")]
    TooLong,

    #[error("Please enter a valid email address")]
    Invalid,
}

/// A validated, normalized waitlist signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistSignup {
    pub email: String,
    /// Which app platform the signup is waiting for.
    pub platform: String,
}

impl WaitlistSignup {
    /// Validate and normalize a raw submitted email: trim, lowercase,
    /// length-cap at 254 characters, match the accepted pattern.
    pub fn parse(raw_email: &str, platform: &str) -> Result<Self, EmailError> {
        let email = raw_email.trim().to_lowercase();

        if email.is_empty() {
            return Err(EmailError::Missing);
        }
        if email.len() > MAX_EMAIL_LEN {
            return Err(EmailError::TooLong);
        }
        if !EMAIL_RE.is_match(&email) {
            return Err(EmailError::Invalid);
        }

        Ok(Self {
            email,
            platform: platform.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let signup = WaitlistSignup::parse(" User@Example.com ", "android").unwrap();
        assert_eq!(signup.email, "user@example.com");
        assert_eq!(signup.platform, "android");
    }

    #[test]
    fn rejects_empty_and_whitespace_only() {
        assert!(matches!(
            WaitlistSignup::parse("", "android"),
            Err(EmailError::Missing)
        ));
        assert!(matches!(
            WaitlistSignup::parse("   ", "android"),
            Err(EmailError::Missing)
        ));
    }

    #[test]
    fn rejects_oversized_addresses() {
        let raw = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            WaitlistSignup::parse(&raw, "android"),
            Err(EmailError::TooLong)
        ));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["plainaddress", "no@tld@twice.com", "trailing.dot@example.", "@example.com"] {
            assert!(
                matches!(WaitlistSignup::parse(bad, "android"), Err(EmailError::Invalid)),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_common_addresses() {
        for good in ["user@example.com", "first.last+tag@sub.example.co"] {
            assert!(WaitlistSignup::parse(good, "android").is_ok(), "{good}");
        }
    }
}
