//! Admin image library.

use actix_web::{HttpResponse, web};

use quill_shared::dto::ImageAssetResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// All uploaded assets, newest first, each flagged with a best-effort
/// "in use" signal (URL substring search over post content and covers).
///
/// GET /api/admin/images
pub async fn list(_identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let assets = state.storage.list().await?;
    let posts = state.posts.list().await?;

    let response: Vec<ImageAssetResponse> = assets
        .into_iter()
        .map(|asset| ImageAssetResponse {
            in_use: asset.in_use(&posts),
            name: asset.name,
            url: asset.url,
            created_at: asset.created_at,
        })
        .collect();
    Ok(HttpResponse::Ok().json(response))
}

/// Permanently delete an asset. Posts that embedded its URL keep the dead
/// reference; the dashboard warns before calling this on an in-use image.
///
/// DELETE /api/admin/images/{name}
pub async fn delete(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let name = path.into_inner();
    state.storage.delete(&name).await?;
    tracing::info!(%name, "image deleted");
    Ok(HttpResponse::NoContent().finish())
}
