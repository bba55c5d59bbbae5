//! Application configuration loaded from environment variables.

use std::env;

/// Connection settings for the hosted content store backend.
#[derive(Debug, Clone)]
pub struct ContentStoreSettings {
    pub url: String,
    pub service_key: String,
    /// Secret for validating session tokens locally. When unset, admin
    /// sessions fall back to the self-signed local provider.
    pub jwt_secret: Option<String>,
}

/// Transactional email provider settings.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub api_key: String,
    pub from: String,
}

/// Site identity baked into generated content (sitemap, new drafts).
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub base_url: String,
    pub author_name: String,
    pub author_avatar: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub content_store: Option<ContentStoreSettings>,
    pub mail: Option<MailSettings>,
    pub site: SiteSettings,
    /// Platform tag recorded with waitlist signups.
    pub platform: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let content_store = match (
            env::var("CONTENT_STORE_URL"),
            env::var("CONTENT_STORE_SERVICE_KEY"),
        ) {
            (Ok(url), Ok(service_key)) => Some(ContentStoreSettings {
                url,
                service_key,
                jwt_secret: env::var("CONTENT_STORE_JWT_SECRET").ok(),
            }),
            _ => None,
        };

        let mail = env::var("RESEND_API_KEY").ok().map(|api_key| MailSettings {
            api_key,
            from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Quill <hello@quillstudy.app>".to_string()),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            content_store,
            mail,
            site: SiteSettings {
                base_url: env::var("SITE_URL")
                    .unwrap_or_else(|_| "https://quillstudy.app".to_string()),
                author_name: env::var("AUTHOR_NAME").unwrap_or_else(|_| "Francis".to_string()),
                author_avatar: env::var("AUTHOR_AVATAR")
                    .unwrap_or_else(|_| "/images/avatar.png".to_string()),
            },
            platform: env::var("WAITLIST_PLATFORM").unwrap_or_else(|_| "android".to_string()),
        }
    }
}
