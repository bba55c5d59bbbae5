//! Admin sign-in.

use actix_web::{HttpResponse, web};

use quill_shared::dto::{LoginRequest, LoginResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Exchange admin credentials for a session token.
///
/// POST /api/admin/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let token = state.auth.sign_in(&body.email, &body.password).await?;
    tracing::info!(email = %body.email, "admin signed in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.expiration_seconds().max(0) as u64,
    }))
}
