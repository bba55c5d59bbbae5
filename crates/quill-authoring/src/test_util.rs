//! Shared fakes for the authoring tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use quill_core::StoreError;
use quill_core::domain::{NewPost, Post, PostPatch};
use quill_core::ports::PostStore;

pub(crate) fn sample_post(published: bool) -> Post {
    let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    Post {
        id: "p1".to_string(),
        slug: "sample-post".to_string(),
        title: "Sample Post".to_string(),
        excerpt: "A sample excerpt".to_string(),
        content: "<p>Sample body</p>".to_string(),
        date: "January 1, 2026".to_string(),
        read_time: "1 min read".to_string(),
        author_name: "Francis".to_string(),
        author_avatar: "https://example.com/avatar.png".to_string(),
        cover_image: None,
        published,
        published_at: published.then_some(created),
        created_at: created,
    }
}

/// In-memory post store that records every `update` call.
#[derive(Default)]
pub(crate) struct RecordingStore {
    posts: Mutex<HashMap<String, Post>>,
    updates: Mutex<Vec<(String, PostPatch)>>,
    fail_next_update: AtomicBool,
}

impl RecordingStore {
    pub(crate) fn with_post(post: Post) -> Self {
        let store = Self::default();
        store.posts.lock().unwrap().insert(post.id.clone(), post);
        store
    }

    pub(crate) fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub(crate) fn last_update(&self) -> Option<(String, PostPatch)> {
        self.updates.lock().unwrap().last().cloned()
    }

    pub(crate) fn fail_next_update(&self) {
        self.fail_next_update.store(true, Ordering::SeqCst);
    }
}

pub(crate) fn apply_patch(post: &mut Post, patch: &PostPatch) {
    if let Some(v) = &patch.title {
        post.title = v.clone();
    }
    if let Some(v) = &patch.slug {
        post.slug = v.clone();
    }
    if let Some(v) = &patch.excerpt {
        post.excerpt = v.clone();
    }
    if let Some(v) = &patch.content {
        post.content = v.clone();
    }
    if let Some(v) = &patch.date {
        post.date = v.clone();
    }
    if let Some(v) = &patch.read_time {
        post.read_time = v.clone();
    }
    if let Some(v) = &patch.cover_image {
        post.cover_image = v.clone();
    }
    if let Some(v) = patch.published {
        post.published = v;
    }
    if let Some(v) = patch.published_at {
        post.published_at = v;
    }
}

#[async_trait]
impl PostStore for RecordingStore {
    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.posts.lock().unwrap().values().cloned().collect())
    }

    async fn list_published(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.published)
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.lock().unwrap().get(id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn create(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut posts = self.posts.lock().unwrap();
        if posts.values().any(|p| p.slug == post.slug) {
            return Err(StoreError::Constraint("duplicate slug".to_string()));
        }
        let id = format!("p{}", posts.len() + 1);
        let stored = Post {
            id: id.clone(),
            slug: post.slug,
            title: post.title,
            excerpt: post.excerpt,
            content: post.content,
            date: post.date,
            read_time: post.read_time,
            author_name: post.author_name,
            author_avatar: post.author_avatar,
            cover_image: post.cover_image,
            published: post.published,
            published_at: None,
            created_at: Utc::now(),
        };
        posts.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &str, patch: PostPatch) -> Result<Post, StoreError> {
        if self.fail_next_update.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Connection("store unavailable".to_string()));
        }
        let mut posts = self.posts.lock().unwrap();
        let post = posts.get_mut(id).ok_or(StoreError::NotFound)?;
        apply_patch(post, &patch);
        let updated = post.clone();
        self.updates.lock().unwrap().push((id.to_string(), patch));
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.posts
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
