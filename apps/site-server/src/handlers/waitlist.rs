//! Waitlist signup endpoint.

use actix_web::{HttpResponse, web};

use quill_core::waitlist::{WaitlistError, WaitlistOutcome};
use quill_shared::dto::{WaitlistRequest, WaitlistResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Join the launch waitlist.
///
/// POST /api/waitlist
///
/// A duplicate signup is a 200 with a friendly message, not an error
/// status - the form renders it inline either way.
pub async fn join(
    state: web::Data<AppState>,
    body: web::Json<WaitlistRequest>,
) -> AppResult<HttpResponse> {
    match state.waitlist.join(&body.email).await {
        Ok(WaitlistOutcome::Joined) => Ok(HttpResponse::Ok().json(WaitlistResponse::joined())),
        Ok(WaitlistOutcome::AlreadyJoined) => {
            Ok(HttpResponse::Ok().json(WaitlistResponse::already_joined()))
        }
        Err(WaitlistError::Email(e)) => Err(AppError::BadRequest(e.to_string())),
        Err(WaitlistError::Store(e)) => Err(e.into()),
    }
}
