//! Admin dashboard API. Every route except login requires a valid session
//! via the [`crate::middleware::auth::Identity`] extractor.

mod auth;
mod images;
mod posts;
mod sessions;

use actix_web::{Scope, web};

pub fn scope() -> Scope {
    web::scope("/admin")
        .route("/login", web::post().to(auth::login))
        .route("/overview", web::get().to(posts::overview))
        .route("/posts", web::get().to(posts::list))
        .route("/posts", web::post().to(posts::create_draft))
        .route("/posts/{id}", web::delete().to(posts::delete))
        .route("/images", web::get().to(images::list))
        .route("/images/{name}", web::delete().to(images::delete))
        .service(
            web::scope("/sessions")
                .route("", web::post().to(sessions::open))
                .route("/{id}", web::get().to(sessions::get))
                .route("/{id}", web::patch().to(sessions::edit))
                .route("/{id}", web::delete().to(sessions::close))
                .route("/{id}/publish", web::post().to(sessions::toggle_publish))
                .route("/{id}/save", web::post().to(sessions::save))
                .route("/{id}/images", web::post().to(sessions::upload_image))
                .route("/{id}/previews/{upload_id}", web::get().to(sessions::preview)),
        )
}
