//! Admin post management.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use quill_core::domain::NewPost;
use quill_shared::dto::OverviewResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// All posts, drafts included, newest first.
///
/// GET /api/admin/posts
pub async fn list(_identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Create a fresh untitled draft and return the stored record.
///
/// POST /api/admin/posts
pub async fn create_draft(
    _identity: Identity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let draft = NewPost::draft(
        &state.site.author_name,
        &state.site.author_avatar,
        Utc::now(),
    );
    let created = state.posts.create(draft).await?;
    tracing::info!(post_id = %created.id, "draft created");
    Ok(HttpResponse::Created().json(created))
}

/// Permanently delete a post. Any open editing session is torn down first
/// so a pending autosave cannot resurrect the row.
///
/// DELETE /api/admin/posts/{id}
pub async fn delete(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.registry.close(&id).await;
    state.posts.delete(&id).await?;
    tracing::info!(post_id = %id, "post deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Dashboard counters.
///
/// GET /api/admin/overview
pub async fn overview(_identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    let assets = state.storage.list().await?;

    let live_posts = posts.iter().filter(|p| p.published).count();
    Ok(HttpResponse::Ok().json(OverviewResponse {
        total_posts: posts.len(),
        live_posts,
        drafts: posts.len() - live_posts,
        asset_count: assets.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::in_memory_state;
    use actix_web::{App, test};
    use quill_core::domain::{Post, PostPatch};

    async fn token(state: &crate::state::AppState) -> String {
        state.auth.sign_in("admin@test.com", "hunter2").await.unwrap()
    }

    fn app_routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/api/admin/posts", web::get().to(list))
            .route("/api/admin/posts", web::post().to(create_draft))
            .route("/api/admin/posts/{id}", web::delete().to(delete))
            .route("/api/admin/overview", web::get().to(overview));
    }

    #[actix_web::test]
    async fn admin_routes_reject_missing_and_bad_tokens() {
        let state = in_memory_state();
        let auth = state.auth.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(auth))
                .configure(app_routes),
        )
        .await;

        let bare = test::TestRequest::get().uri("/api/admin/posts").to_request();
        assert_eq!(test::call_service(&app, bare).await.status(), 401);

        let forged = test::TestRequest::get()
            .uri("/api/admin/posts")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        assert_eq!(test::call_service(&app, forged).await.status(), 401);
    }

    #[actix_web::test]
    async fn draft_lifecycle_create_list_delete() {
        let state = in_memory_state();
        let auth = state.auth.clone();
        let token = token(&state).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(auth))
                .configure(app_routes),
        )
        .await;
        let bearer = ("Authorization", format!("Bearer {}", token));

        let req = test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(bearer.clone())
            .to_request();
        let created: Post = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.title, "Untitled Post");
        assert!(!created.published);

        let req = test::TestRequest::get()
            .uri("/api/admin/posts")
            .insert_header(bearer.clone())
            .to_request();
        let posts: Vec<Post> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(posts.len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/admin/posts/{}", created.id))
            .insert_header(bearer.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 204);

        let req = test::TestRequest::get()
            .uri("/api/admin/overview")
            .insert_header(bearer)
            .to_request();
        let overview: OverviewResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(overview.total_posts, 0);
    }

    #[actix_web::test]
    async fn overview_splits_live_posts_from_drafts() {
        let state = in_memory_state();
        let auth = state.auth.clone();
        let token = token(&state).await;

        let draft = NewPost::draft("Francis", "/a.png", Utc::now());
        let created = state.posts.create(draft).await.unwrap();
        let patch = PostPatch {
            published: Some(true),
            ..PostPatch::default()
        };
        state.posts.update(&created.id, patch).await.unwrap();

        let mut second = NewPost::draft("Francis", "/a.png", Utc::now());
        second.slug = "second-draft".to_string();
        state.posts.create(second).await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(auth))
                .configure(app_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/admin/overview")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let overview: OverviewResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(overview.total_posts, 2);
        assert_eq!(overview.live_posts, 1);
        assert_eq!(overview.drafts, 1);
    }
}
