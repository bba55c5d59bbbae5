//! Transactional email implementations.

mod memory;

pub use memory::InMemoryMailer;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{HttpMailer, MailerConfig};
