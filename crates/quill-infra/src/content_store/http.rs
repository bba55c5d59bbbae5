//! HTTP content store client.
//!
//! Talks to a hosted Postgres-over-REST content backend: rows are exposed at
//! `/rest/v1/{table}` with filters in the query string, and every request
//! carries the project api key plus a bearer token.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};

use quill_core::StoreError;
use quill_core::domain::{NewPost, Post, PostPatch, WaitlistSignup};
use quill_core::ports::{PostStore, WaitlistStore};

/// HTTP content store configuration.
#[derive(Debug, Clone)]
pub struct ContentStoreConfig {
    /// Project base URL, without a trailing slash.
    pub base_url: String,
    /// Service-role key, used as both the api key and the bearer token.
    pub service_key: String,
}

impl ContentStoreConfig {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            service_key: service_key.into(),
        }
    }
}

/// Content store backed by the hosted REST API.
pub struct HttpContentStore {
    client: Client,
    config: ContentStoreConfig,
}

impl HttpContentStore {
    pub fn new(config: ContentStoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, table)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.service_key)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.config.service_key),
            )
            .header(CONTENT_TYPE, "application/json")
    }

    async fn fetch_posts(&self, query: &[(&str, &str)]) -> Result<Vec<Post>, StoreError> {
        let response = self
            .authed(self.client.get(self.table_url("posts")))
            .query(query)
            .send()
            .await
            .map_err(connection_error)?;
        let response = check_status(response).await?;
        response
            .json::<Vec<Post>>()
            .await
            .map_err(|e| StoreError::Request(format!("invalid posts payload: {e}")))
    }
}

#[async_trait]
impl PostStore for HttpContentStore {
    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        self.fetch_posts(&[("select", "*"), ("order", "created_at.desc")])
            .await
    }

    async fn list_published(&self) -> Result<Vec<Post>, StoreError> {
        self.fetch_posts(&[
            ("select", "*"),
            ("published", "eq.true"),
            ("order", "published_at.desc.nullslast"),
        ])
        .await
    }

    async fn get(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let filter = format!("eq.{id}");
        let mut posts = self
            .fetch_posts(&[("select", "*"), ("id", &filter), ("limit", "1")])
            .await?;
        Ok(posts.pop())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let filter = format!("eq.{slug}");
        let mut posts = self
            .fetch_posts(&[("select", "*"), ("slug", &filter), ("limit", "1")])
            .await?;
        Ok(posts.pop())
    }

    async fn create(&self, post: NewPost) -> Result<Post, StoreError> {
        let response = self
            .authed(self.client.post(self.table_url("posts")))
            .header("Prefer", "return=representation")
            .json(&post)
            .send()
            .await
            .map_err(connection_error)?;
        let response = check_status(response).await?;
        let mut rows: Vec<Post> = response
            .json()
            .await
            .map_err(|e| StoreError::Request(format!("invalid create payload: {e}")))?;
        rows.pop()
            .ok_or_else(|| StoreError::Request("create returned no row".to_string()))
    }

    async fn update(&self, id: &str, patch: PostPatch) -> Result<Post, StoreError> {
        let response = self
            .authed(self.client.patch(self.table_url("posts")))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await
            .map_err(connection_error)?;
        let response = check_status(response).await?;
        let mut rows: Vec<Post> = response
            .json()
            .await
            .map_err(|e| StoreError::Request(format!("invalid update payload: {e}")))?;
        // An empty representation means the filter matched nothing.
        rows.pop().ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .authed(self.client.delete(self.table_url("posts")))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(connection_error)?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl WaitlistStore for HttpContentStore {
    async fn insert(&self, signup: &WaitlistSignup) -> Result<(), StoreError> {
        let response = self
            .authed(self.client.post(self.table_url("waitlist")))
            .json(&signup)
            .send()
            .await
            .map_err(connection_error)?;
        check_status(response).await?;
        Ok(())
    }
}

fn connection_error(e: reqwest::Error) -> StoreError {
    StoreError::Connection(e.to_string())
}

/// Map a non-success response to a [`StoreError`]. Unique-violation errors
/// come back as HTTP 409 with Postgres code 23505 in the body.
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::CONFLICT || body.contains("23505") {
        return Err(StoreError::Constraint(body));
    }
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound);
    }
    Err(StoreError::Request(format!("{status}: {body}")))
}
