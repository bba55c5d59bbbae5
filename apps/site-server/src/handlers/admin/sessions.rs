//! Editing session endpoints - the dashboard's view onto the draft/publish
//! state machine and the image upload pipeline.

use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures::StreamExt;
use uuid::Uuid;

use quill_authoring::{EditingSession, FieldEdit, SessionView, UploadFile};
use quill_shared::dto::{EditRequest, OpenSessionRequest, SessionResponse, UploadResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn session_json(view: SessionView) -> SessionResponse {
    SessionResponse {
        post: view.post,
        dirty: view.dirty,
        save_status: view.status.as_str().to_string(),
        upload_in_flight: view.upload_in_flight,
    }
}

async fn find_session(state: &AppState, post_id: &str) -> AppResult<Arc<EditingSession>> {
    state
        .registry
        .get(post_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No open session for post {}", post_id)))
}

/// Open (or resume) an editing session for a post.
///
/// POST /api/admin/sessions
pub async fn open(
    _identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<OpenSessionRequest>,
) -> AppResult<HttpResponse> {
    let session = state.registry.open(&body.post_id).await?;
    Ok(HttpResponse::Ok().json(session_json(session.view().await)))
}

/// Current session snapshot.
///
/// GET /api/admin/sessions/{id}
pub async fn get(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let session = find_session(&state, &path).await?;
    Ok(HttpResponse::Ok().json(session_json(session.view().await)))
}

/// Apply one field edit. Draft edits restart the autosave debounce;
/// published edits only mark the session dirty.
///
/// PATCH /api/admin/sessions/{id}
pub async fn edit(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<EditRequest>,
) -> AppResult<HttpResponse> {
    let session = find_session(&state, &path).await?;

    let edit = match body.into_inner() {
        EditRequest::Title(v) => FieldEdit::Title(v),
        EditRequest::Slug(v) => FieldEdit::Slug(v),
        EditRequest::Excerpt(v) => FieldEdit::Excerpt(v),
        EditRequest::Content(v) => FieldEdit::Content(v),
        EditRequest::CoverImage(v) => FieldEdit::CoverImage(v),
        EditRequest::ReadTime { words } => FieldEdit::ReadTime { words },
    };
    session.apply(edit).await;
    Ok(HttpResponse::Ok().json(session_json(session.view().await)))
}

/// Close the session, dropping any armed autosave.
///
/// DELETE /api/admin/sessions/{id}
pub async fn close(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    if state.registry.close(&path).await {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!("No open session for post {}", *path)))
    }
}

/// Flip publish state and persist immediately.
///
/// POST /api/admin/sessions/{id}/publish
pub async fn toggle_publish(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let session = find_session(&state, &path).await?;
    session.toggle_publish().await?;
    Ok(HttpResponse::Ok().json(session_json(session.view().await)))
}

/// Manual save - "Update Live Post" for published posts, skip-the-wait
/// for drafts.
///
/// POST /api/admin/sessions/{id}/save
pub async fn save(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let session = find_session(&state, &path).await?;
    session.save_now().await?;
    Ok(HttpResponse::Ok().json(session_json(session.view().await)))
}

/// Upload an image into the session's document.
///
/// POST /api/admin/sessions/{id}/images (multipart)
pub async fn upload_image(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let session = find_session(&state, &path).await?;
    let file = read_upload(&mut payload).await?;
    let url = state.uploads.process(&session, file).await?;
    Ok(HttpResponse::Ok().json(UploadResponse { url }))
}

/// Serve the held preview bytes for an in-flight upload.
///
/// GET /api/admin/sessions/{id}/previews/{upload_id}
pub async fn preview(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<(String, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, upload_id) = path.into_inner();
    let session = find_session(&state, &post_id).await?;
    let preview = session
        .preview(upload_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No pending upload {}", upload_id)))?;
    Ok(HttpResponse::Ok()
        .content_type(preview.content_type)
        .body(preview.bytes))
}

/// Pull the first file out of a multipart payload.
async fn read_upload(payload: &mut Multipart) -> AppResult<UploadFile> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Malformed multipart payload: {e}")))?;

        let Some(filename) = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
        else {
            continue;
        };
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Upload stream failed: {e}")))?;
            bytes.extend_from_slice(&chunk);
        }
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }
        return Ok(UploadFile {
            filename,
            content_type,
            bytes,
        });
    }
    Err(AppError::BadRequest("Missing file field".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::in_memory_state;
    use actix_web::{App, test};
    use chrono::Utc;
    use quill_core::domain::NewPost;

    async fn seeded_state() -> (crate::state::AppState, String, String) {
        let state = in_memory_state();
        let token = state.auth.sign_in("admin@test.com", "hunter2").await.unwrap();
        let created = state
            .posts
            .create(NewPost::draft("Francis", "/a.png", Utc::now()))
            .await
            .unwrap();
        (state, token, created.id)
    }

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope("/api/admin/sessions")
                .route("", web::post().to(open))
                .route("/{id}", web::get().to(get))
                .route("/{id}", web::patch().to(edit))
                .route("/{id}", web::delete().to(close))
                .route("/{id}/publish", web::post().to(toggle_publish))
                .route("/{id}/save", web::post().to(save)),
        );
    }

    #[actix_web::test]
    async fn open_edit_and_publish_roundtrip() {
        let (state, token, post_id) = seeded_state().await;
        let auth = state.auth.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(auth))
                .configure(routes),
        )
        .await;
        let bearer = ("Authorization", format!("Bearer {}", token));

        let req = test::TestRequest::post()
            .uri("/api/admin/sessions")
            .insert_header(bearer.clone())
            .set_json(OpenSessionRequest {
                post_id: post_id.clone(),
            })
            .to_request();
        let opened: SessionResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!opened.dirty);
        assert_eq!(opened.save_status, "saved");

        // A title edit re-derives the slug and marks the session dirty.
        let req = test::TestRequest::patch()
            .uri(&format!("/api/admin/sessions/{}", post_id))
            .insert_header(bearer.clone())
            .set_json(serde_json::json!({ "field": "title", "value": "Focus Better" }))
            .to_request();
        let edited: SessionResponse = test::call_and_read_body_json(&app, req).await;
        assert!(edited.dirty);
        assert_eq!(edited.post.title, "Focus Better");
        assert_eq!(edited.post.slug, "focus-better");

        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/sessions/{}/publish", post_id))
            .insert_header(bearer.clone())
            .to_request();
        let published: SessionResponse = test::call_and_read_body_json(&app, req).await;
        assert!(published.post.published);
        assert!(published.post.published_at.is_some());
        assert!(!published.dirty, "publish persists the pending edits");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/admin/sessions/{}", post_id))
            .insert_header(bearer)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 204);
    }

    #[actix_web::test]
    async fn opening_an_unknown_post_is_a_404() {
        let (state, token, _) = seeded_state().await;
        let auth = state.auth.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(auth))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/admin/sessions")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(OpenSessionRequest {
                post_id: "missing".to_string(),
            })
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn manual_save_clears_the_dirty_flag() {
        let (state, token, post_id) = seeded_state().await;
        let auth = state.auth.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(auth))
                .configure(routes),
        )
        .await;
        let bearer = ("Authorization", format!("Bearer {}", token));

        let req = test::TestRequest::post()
            .uri("/api/admin/sessions")
            .insert_header(bearer.clone())
            .set_json(OpenSessionRequest {
                post_id: post_id.clone(),
            })
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/admin/sessions/{}", post_id))
            .insert_header(bearer.clone())
            .set_json(serde_json::json!({ "field": "excerpt", "value": "Short and sweet" }))
            .to_request();
        let edited: SessionResponse = test::call_and_read_body_json(&app, req).await;
        assert!(edited.dirty);

        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/sessions/{}/save", post_id))
            .insert_header(bearer)
            .to_request();
        let saved: SessionResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!saved.dirty);
        assert_eq!(saved.save_status, "saved");
    }
}
