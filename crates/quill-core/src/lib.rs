//! # Quill Core
//!
//! The domain layer of the Quill marketing-site backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the post and image-asset entities, the document model the editor works on,
//! waitlist validation, and the port traits infrastructure must implement.

pub mod domain;
pub mod error;
pub mod ports;
pub mod waitlist;

pub use error::StoreError;
