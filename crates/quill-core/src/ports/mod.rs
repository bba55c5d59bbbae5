//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod content_store;
mod mailer;
mod optimizer;
mod rate_limit;
mod storage;

pub use auth::{AuthError, SessionClaims, SessionProvider};
pub use content_store::{PostStore, WaitlistStore};
pub use mailer::{MailError, Mailer, OutgoingEmail};
pub use optimizer::{ImageOptimizer, OptimizeError, OptimizedImage};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use storage::{ObjectStorage, StorageError};
