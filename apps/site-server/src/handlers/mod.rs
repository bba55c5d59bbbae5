//! HTTP handlers and route configuration.

pub mod admin;
mod health;
mod pages;
mod posts;
mod seo;
mod waitlist;

use actix_web::web;

use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/posts", web::get().to(posts::list_published))
            .route("/posts/{slug}", web::get().to(posts::get_by_slug))
            .route("/pages/{slug}", web::get().to(pages::get_page))
            .service(
                web::scope("/waitlist")
                    .wrap(RateLimitMiddleware::new(state.rate_limiter.clone()))
                    .route("", web::post().to(waitlist::join)),
            )
            // Admin routes (session-gated via the Identity extractor)
            .service(admin::scope()),
    )
    .route("/sitemap.xml", web::get().to(seo::sitemap))
    .route("/robots.txt", web::get().to(seo::robots));
}
