//! In-memory content store.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use quill_core::StoreError;
use quill_core::domain::{NewPost, Post, PostPatch, WaitlistSignup};
use quill_core::ports::{PostStore, WaitlistStore};

/// In-memory content store.
///
/// This is the fallback when no content store backend is configured.
/// Data does not survive a restart; it exists so the site and the admin
/// dashboard work end to end in local development.
#[derive(Default)]
pub struct InMemoryContentStore {
    posts: Mutex<HashMap<String, Post>>,
    waitlist: Mutex<HashSet<String>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store, e.g. with demo posts for local development.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let store = Self::new();
        {
            let mut map = store.posts.lock().expect("posts lock");
            for post in posts {
                map.insert(post.id.clone(), post);
            }
        }
        store
    }
}

#[async_trait]
impl PostStore for InMemoryContentStore {
    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .expect("posts lock")
            .values()
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn list_published(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .expect("posts lock")
            .values()
            .filter(|p| p.published)
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(posts)
    }

    async fn get(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.lock().expect("posts lock").get(id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        Ok(self
            .posts
            .lock()
            .expect("posts lock")
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn create(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut posts = self.posts.lock().expect("posts lock");
        if posts.values().any(|p| p.slug == post.slug) {
            return Err(StoreError::Constraint(format!(
                "duplicate key value violates unique constraint: slug {}",
                post.slug
            )));
        }
        let id = Uuid::new_v4().to_string();
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
        let mut posts = self.posts.lock().expect("posts lock");
        let post = posts.get_mut(id).ok_or(StoreError::NotFound)?;
        if let Some(v) = patch.title {
            post.title = v;
        }
        if let Some(v) = patch.slug {
            post.slug = v;
        }
        if let Some(v) = patch.excerpt {
            post.excerpt = v;
        }
        if let Some(v) = patch.content {
            post.content = v;
        }
        if let Some(v) = patch.date {
            post.date = v;
        }
        if let Some(v) = patch.read_time {
            post.read_time = v;
        }
        if let Some(v) = patch.cover_image {
            post.cover_image = v;
        }
        if let Some(v) = patch.published {
            post.published = v;
        }
        if let Some(v) = patch.published_at {
            post.published_at = v;
        }
        Ok(post.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.posts
            .lock()
            .expect("posts lock")
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl WaitlistStore for InMemoryContentStore {
    async fn insert(&self, signup: &WaitlistSignup) -> Result<(), StoreError> {
        let mut waitlist = self.waitlist.lock().expect("waitlist lock");
        if !waitlist.insert(signup.email.clone()) {
            return Err(StoreError::Constraint(
                "duplicate key value violates unique constraint: email".to_string(),
            ));
        }
        Ok(())
    }
}
