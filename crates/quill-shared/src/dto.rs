//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quill_core::domain::Post;

/// Request to join the waitlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistRequest {
    pub email: String,
}

/// Waitlist outcome. The duplicate case is a friendly message on a 200,
/// not an error status - the form shows it inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WaitlistResponse {
    pub fn joined() -> Self {
        Self {
            success: Some(true),
            error: None,
        }
    }

    pub fn already_joined() -> Self {
        Self {
            success: None,
            error: Some("You are already on the waitlist!".to_string()),
        }
    }
}

/// Request to sign in to the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing the admin session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Dashboard overview counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub total_posts: usize,
    pub live_posts: usize,
    pub drafts: usize,
    pub asset_count: usize,
}

/// A stored image asset, annotated with whether any post references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAssetResponse {
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub in_use: bool,
}

/// Request to open (or resume) an editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenSessionRequest {
    pub post_id: String,
}

/// Snapshot of an editing session for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub post: Post,
    pub dirty: bool,
    /// One of "saved", "saving", "error".
    pub save_status: String,
    pub upload_in_flight: bool,
}

/// A single field edit applied to an open editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum EditRequest {
    Title(String),
    Slug(String),
    Excerpt(String),
    Content(String),
    CoverImage(Option<String>),
    ReadTime { words: u32 },
}

/// Result of an image upload into an editing session.
///
/// `url` is absent when the placeholder was deleted mid-upload and the
/// result discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waitlist_duplicate_serializes_as_a_bare_error() {
        let json = serde_json::to_value(WaitlistResponse::already_joined()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "error": "You are already on the waitlist!" })
        );
    }

    #[test]
    fn edit_requests_are_field_tagged() {
        let edit: EditRequest =
            serde_json::from_str(r#"{ "field": "title", "value": "New Title" }"#).unwrap();
        assert!(matches!(edit, EditRequest::Title(t) if t == "New Title"));

        let edit: EditRequest =
            serde_json::from_str(r#"{ "field": "cover_image", "value": null }"#).unwrap();
        assert!(matches!(edit, EditRequest::CoverImage(None)));

        let edit: EditRequest =
            serde_json::from_str(r#"{ "field": "read_time", "value": { "words": 420 } }"#).unwrap();
        assert!(matches!(edit, EditRequest::ReadTime { words: 420 }));
    }
}
