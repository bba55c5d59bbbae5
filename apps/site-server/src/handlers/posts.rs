//! Public blog endpoints.

use actix_web::{HttpResponse, web};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Published posts, newest first.
///
/// GET /api/posts
pub async fn list_published(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_published().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// One published post by slug. Drafts are invisible here, even with a
/// valid slug.
///
/// GET /api/posts/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let post = state
        .posts
        .get_by_slug(&slug)
        .await?
        .filter(|p| p.published)
        .ok_or_else(|| AppError::NotFound(format!("No post with slug {}", slug)))?;
    Ok(HttpResponse::Ok().json(post))
}
