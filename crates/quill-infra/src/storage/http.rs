//! HTTP object storage client.
//!
//! Uploads live in a single public bucket under a fixed `blog/` prefix;
//! the public URL is derived from the bucket layout rather than returned
//! by the API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use quill_core::domain::ImageAsset;
use quill_core::ports::{ObjectStorage, StorageError};

/// HTTP object storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Project base URL, without a trailing slash.
    pub base_url: String,
    pub service_key: String,
    pub bucket: String,
    /// Folder inside the bucket that all uploads go under.
    pub prefix: String,
}

impl StorageConfig {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            service_key: service_key.into(),
            bucket: "blog-images".to_string(),
            prefix: "blog".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
    created_at: Option<DateTime<Utc>>,
}

/// Object storage backed by the hosted storage API.
pub struct HttpStorage {
    client: Client,
    config: StorageConfig,
}

impl HttpStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn object_url(&self, name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}/{}",
            self.config.base_url, self.config.bucket, self.config.prefix, name
        )
    }
}

#[async_trait]
impl ObjectStorage for HttpStorage {
    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let response = self
            .client
            .post(self.object_url(name))
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.config.service_key),
            )
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(connection_error)?;
        check_status(response).await?;
        Ok(self.public_url(name))
    }

    async fn list(&self) -> Result<Vec<ImageAsset>, StorageError> {
        let url = format!(
            "{}/storage/v1/object/list/{}",
            self.config.base_url, self.config.bucket
        );
        let response = self
            .client
            .post(url)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.config.service_key),
            )
            .json(&json!({
                "prefix": self.config.prefix,
                "limit": 1000,
                "sortBy": { "column": "created_at", "order": "desc" },
            }))
            .send()
            .await
            .map_err(connection_error)?;
        let response = check_status(response).await?;
        let objects: Vec<ListedObject> = response
            .json()
            .await
            .map_err(|e| StorageError::Request(format!("invalid list payload: {e}")))?;

        Ok(objects
            .into_iter()
            // The listing includes folder pseudo-entries with no timestamp.
            .filter(|o| o.created_at.is_some())
            .map(|o| ImageAsset {
                url: self.public_url(&o.name),
                created_at: o.created_at.unwrap_or_default(),
                name: o.name,
            })
            .collect())
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .delete(self.object_url(name))
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.config.service_key),
            )
            .send()
            .await
            .map_err(connection_error)?;
        check_status(response).await?;
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}/{}",
            self.config.base_url, self.config.bucket, self.config.prefix, name
        )
    }
}

fn connection_error(e: reqwest::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

async fn check_status(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(StorageError::NotFound);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StorageError::Request(format!("{status}: {body}")))
}
