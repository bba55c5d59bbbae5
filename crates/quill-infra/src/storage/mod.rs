//! Object storage implementations for uploaded images.

mod memory;

pub use memory::InMemoryStorage;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{HttpStorage, StorageConfig};
