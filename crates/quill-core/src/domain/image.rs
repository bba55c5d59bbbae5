use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Post;

/// Image asset - an uploaded binary object in the store's `blog/` namespace.
///
/// Posts reference assets only by URL string inside `content`/`cover_image`;
/// there is no foreign key, and deleting an asset does not retract it from
/// posts that already embedded it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Generated random filename with extension.
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl ImageAsset {
    /// Best-effort usage signal: substring search of the public URL over
    /// every post's content and cover image. Not an exact reference count -
    /// it can both under- and over-report.
    pub fn in_use(&self, posts: &[Post]) -> bool {
        posts.iter().any(|p| {
            p.content.contains(&self.url)
                || p.cover_image.as_deref().is_some_and(|c| c.contains(&self.url))
        })
    }
}
