//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the content store, object storage, mailer, auth,
//! and media integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `http` - HTTP adapters for the content store, object storage, and mailer
//! - `auth` - Session token issuing and validation
//! - `rate-limit` - Rate limiting via governor
//! - `media` - Image optimization via the image crate

pub mod content_store;
pub mod mailer;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "media")]
pub mod media;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use content_store::InMemoryContentStore;
pub use mailer::InMemoryMailer;
pub use storage::InMemoryStorage;

#[cfg(feature = "auth")]
pub use auth::{LocalAuthConfig, LocalSessions};

#[cfg(feature = "media")]
pub use media::{OptimizerConfig, StandardOptimizer};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

// Re-exports - HTTP
#[cfg(feature = "http")]
pub use content_store::{ContentStoreConfig, HttpContentStore};
#[cfg(feature = "http")]
pub use mailer::{HttpMailer, MailerConfig};
#[cfg(feature = "http")]
pub use storage::{HttpStorage, StorageConfig};

#[cfg(all(feature = "http", feature = "auth"))]
pub use auth::{RemoteAuthConfig, RemoteSessions};
