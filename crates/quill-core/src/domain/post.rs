use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - a content record in the store.
///
/// `id` and `created_at` are assigned by the content store; `slug` uniqueness
/// is enforced by the store, not the client (a duplicate-slug write fails).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    /// Display date string, stamped on first publish.
    pub date: String,
    /// Derived display string, e.g. "3 min read".
    pub read_time: String,
    pub author_name: String,
    pub author_avatar: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub published: bool,
    /// Set exactly once, on the first unpublished->published transition.
    /// Never cleared or reset by later unpublish/republish cycles.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// A post is dirty iff one of the tracked fields differs from the
    /// last-persisted snapshot. `read_time` and `date` never factor in.
    pub fn differs_from(&self, snapshot: &Post) -> bool {
        self.title != snapshot.title
            || self.slug != snapshot.slug
            || self.excerpt != snapshot.excerpt
            || self.content != snapshot.content
            || self.cover_image != snapshot.cover_image
    }

    /// Transition to published. The first publish stamps `published_at` and
    /// the display `date`; republishing leaves both untouched.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.published = true;
        if self.published_at.is_none() {
            self.published_at = Some(now);
            self.date = display_date(now);
        }
    }

    /// Transition to unpublished. Does not clear `published_at`.
    pub fn unpublish(&mut self) {
        self.published = false;
    }

    /// Full mutable-field patch for persisting the current editing state.
    pub fn as_patch(&self) -> PostPatch {
        PostPatch {
            title: Some(self.title.clone()),
            slug: Some(self.slug.clone()),
            excerpt: Some(self.excerpt.clone()),
            content: Some(self.content.clone()),
            date: Some(self.date.clone()),
            read_time: Some(self.read_time.clone()),
            cover_image: Some(self.cover_image.clone()),
            published: Some(self.published),
            published_at: Some(self.published_at),
        }
    }
}

/// A post about to be created - everything but the store-assigned fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub date: String,
    pub read_time: String,
    pub author_name: String,
    pub author_avatar: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub published: bool,
}

impl NewPost {
    /// Fresh draft with placeholder fields, never published.
    pub fn draft(author_name: &str, author_avatar: &str, now: DateTime<Utc>) -> Self {
        Self {
            title: "Untitled Post".to_string(),
            slug: format!("post-{}", now.timestamp_millis()),
            excerpt: "New post excerpt...".to_string(),
            content: "<p>Start writing...</p>".to_string(),
            date: display_date(now),
            read_time: "5 min read".to_string(),
            author_name: author_name.to_string(),
            author_avatar: author_avatar.to_string(),
            cover_image: None,
            published: false,
        }
    }
}

/// Partial-field update. Only set fields are serialized, so the store
/// receives exactly the columns being changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Option<DateTime<Utc>>>,
}

/// URL-safe slug from a title: lowercase, strip non-word characters,
/// collapse spaces into dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = false;
    for c in title.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if (c == ' ' || c == '-') && !last_dash && !slug.is_empty() {
            slug.push('-');
            last_dash = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Reading-time display label at 200 words per minute, floor of one minute.
pub fn read_time_label(words: u32) -> String {
    let minutes = (words.max(1)).div_ceil(200).max(1);
    format!("{} min read", minutes)
}

/// Display date in the site's long format, e.g. "March 4, 2026".
pub fn display_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_post() -> Post {
        Post {
            id: "p1".to_string(),
            slug: "hello-world".to_string(),
            title: "Hello World".to_string(),
            excerpt: "An excerpt".to_string(),
            content: "<p>Body</p>".to_string(),
            date: "January 1, 2026".to_string(),
            read_time: "3 min read".to_string(),
            author_name: "Francis".to_string(),
            author_avatar: "https://example.com/a.png".to_string(),
            cover_image: None,
            published: false,
            published_at: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn slugify_strips_and_dashes() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's new in 2026?"), "whats-new-in-2026");
        assert_eq!(slugify("  Spaced   Out  "), "spaced-out");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn read_time_has_floor_of_one_minute() {
        assert_eq!(read_time_label(0), "1 min read");
        assert_eq!(read_time_label(150), "1 min read");
        assert_eq!(read_time_label(201), "2 min read");
        assert_eq!(read_time_label(999), "5 min read");
    }

    #[test]
    fn first_publish_stamps_published_at_once() {
        let mut post = sample_post();
        let first = Utc.with_ymd_and_hms(2026, 3, 4, 12, 0, 0).unwrap();
        post.publish(first);
        assert!(post.published);
        assert_eq!(post.published_at, Some(first));
        assert_eq!(post.date, "March 4, 2026");

        // Unpublish/republish cycles leave the stamp untouched.
        post.unpublish();
        assert!(!post.published);
        assert_eq!(post.published_at, Some(first));

        let later = Utc.with_ymd_and_hms(2026, 5, 6, 12, 0, 0).unwrap();
        post.publish(later);
        assert_eq!(post.published_at, Some(first));
        assert_eq!(post.date, "March 4, 2026");
    }

    #[test]
    fn read_time_change_is_not_dirty() {
        let snapshot = sample_post();
        let mut edited = snapshot.clone();
        edited.read_time = "9 min read".to_string();
        edited.date = "February 2, 2026".to_string();
        assert!(!edited.differs_from(&snapshot));
    }

    #[test]
    fn tracked_field_changes_are_dirty() {
        let snapshot = sample_post();
        for f in ["title", "slug", "excerpt", "content", "cover"] {
            let mut edited = snapshot.clone();
            match f {
                "title" => edited.title.push('!'),
                "slug" => edited.slug.push('x'),
                "excerpt" => edited.excerpt.push('.'),
                "content" => edited.content.push_str("<p>more</p>"),
                _ => edited.cover_image = Some("https://example.com/c.png".to_string()),
            }
            assert!(edited.differs_from(&snapshot), "{f} edit should be dirty");
        }
    }
}
