//! Content store implementations for posts and waitlist rows.

mod memory;

pub use memory::InMemoryContentStore;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{ContentStoreConfig, HttpContentStore};
