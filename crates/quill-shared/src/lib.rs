//! # Quill Shared
//!
//! Request/response types shared between the site frontend and the API.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
