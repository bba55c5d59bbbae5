//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_authoring::{ImageUploadPipeline, SessionRegistry};
use quill_core::ports::{
    Mailer, ObjectStorage, PostStore, RateLimiter, SessionProvider, WaitlistStore,
};
use quill_core::waitlist::WaitlistService;
use quill_infra::auth::{LocalSessions, RemoteAuthConfig, RemoteSessions};
use quill_infra::content_store::{ContentStoreConfig, HttpContentStore, InMemoryContentStore};
use quill_infra::mailer::{HttpMailer, InMemoryMailer, MailerConfig};
use quill_infra::media::StandardOptimizer;
use quill_infra::rate_limit::InMemoryRateLimiter;
use quill_infra::storage::{HttpStorage, InMemoryStorage, StorageConfig};

use crate::config::{AppConfig, SiteSettings};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub auth: Arc<dyn SessionProvider>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub registry: Arc<SessionRegistry>,
    pub uploads: Arc<ImageUploadPipeline>,
    pub waitlist: Arc<WaitlistService>,
    pub site: SiteSettings,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    /// Every unconfigured backend falls back to an in-memory adapter so the
    /// server always comes up in local development.
    pub fn new(config: &AppConfig) -> Self {
        let (posts, waitlist_store): (Arc<dyn PostStore>, Arc<dyn WaitlistStore>) =
            match &config.content_store {
                Some(settings) => {
                    let store = Arc::new(HttpContentStore::new(ContentStoreConfig::new(
                        &settings.url,
                        &settings.service_key,
                    )));
                    (store.clone(), store)
                }
                None => {
                    tracing::warn!(
                        "CONTENT_STORE_URL not set. Using in-memory content store (data is not persisted)."
                    );
                    let store = Arc::new(InMemoryContentStore::new());
                    (store.clone(), store)
                }
            };

        let storage: Arc<dyn ObjectStorage> = match &config.content_store {
            Some(settings) => Arc::new(HttpStorage::new(StorageConfig::new(
                &settings.url,
                &settings.service_key,
            ))),
            None => {
                tracing::warn!("Using in-memory object storage (uploads are not persisted).");
                Arc::new(InMemoryStorage::new())
            }
        };

        let auth: Arc<dyn SessionProvider> = match &config.content_store {
            Some(settings) if settings.jwt_secret.is_some() => {
                let jwt_secret = settings.jwt_secret.clone().unwrap_or_default();
                Arc::new(RemoteSessions::new(RemoteAuthConfig::new(
                    &settings.url,
                    &settings.service_key,
                    jwt_secret,
                )))
            }
            _ => {
                tracing::warn!(
                    "CONTENT_STORE_JWT_SECRET not set. Using the local admin session provider."
                );
                Arc::new(LocalSessions::from_env())
            }
        };

        let mailer: Arc<dyn Mailer> = match &config.mail {
            Some(settings) => Arc::new(HttpMailer::new(MailerConfig::new(
                &settings.api_key,
                &settings.from,
            ))),
            None => {
                tracing::warn!("RESEND_API_KEY not set. Welcome emails are recorded, not sent.");
                Arc::new(InMemoryMailer::new())
            }
        };

        let registry = Arc::new(SessionRegistry::new(posts.clone()));
        let uploads = Arc::new(ImageUploadPipeline::new(
            storage.clone(),
            Arc::new(StandardOptimizer::default()),
        ));
        let waitlist = Arc::new(WaitlistService::new(
            waitlist_store,
            mailer,
            &config.platform,
        ));

        tracing::info!("Application state initialized");

        Self {
            posts,
            storage,
            auth,
            rate_limiter: Arc::new(InMemoryRateLimiter::from_env()),
            registry,
            uploads,
            waitlist,
            site: config.site.clone(),
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use quill_infra::auth::LocalAuthConfig;
    use quill_infra::rate_limit::RateLimitConfig;

    /// Fully in-memory state for handler tests.
    pub fn in_memory_state() -> AppState {
        let store = Arc::new(InMemoryContentStore::new());
        let posts: Arc<dyn PostStore> = store.clone();
        let waitlist_store: Arc<dyn WaitlistStore> = store;
        let storage: Arc<dyn ObjectStorage> = Arc::new(InMemoryStorage::new());
        let mailer: Arc<dyn Mailer> = Arc::new(InMemoryMailer::new());

        AppState {
            posts: posts.clone(),
            storage: storage.clone(),
            auth: Arc::new(LocalSessions::new(LocalAuthConfig {
                admin_email: "admin@test.com".to_string(),
                admin_password: "hunter2".to_string(),
                secret: "test-secret".to_string(),
                expiration_hours: 1,
                issuer: "test".to_string(),
            })),
            rate_limiter: Arc::new(InMemoryRateLimiter::new(RateLimitConfig::default())),
            registry: Arc::new(SessionRegistry::new(posts)),
            uploads: Arc::new(ImageUploadPipeline::new(
                storage,
                Arc::new(StandardOptimizer::default()),
            )),
            waitlist: Arc::new(WaitlistService::new(waitlist_store, mailer, "android")),
            site: SiteSettings {
                base_url: "https://quillstudy.app".to_string(),
                author_name: "Francis".to_string(),
                author_avatar: "/images/avatar.png".to_string(),
            },
        }
    }
}
