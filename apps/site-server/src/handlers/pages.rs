//! Static site pages served as structured content.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::middleware::error::{AppError, AppResult};

#[derive(Serialize)]
pub struct PageResponse {
    pub slug: &'static str,
    pub title: &'static str,
    pub html: &'static str,
}

const PAGES: [PageResponse; 4] = [
    PageResponse {
        slug: "privacy",
        title: "Privacy Policy",
        html: "<h1>Privacy Policy</h1>\
            <p>Quill stores your study material on your device and syncs it only when you ask it to. \
            We collect the minimum analytics needed to keep the app working and never sell your data.</p>\
            <p>Waitlist emails are used solely to notify you about the Android launch. \
            You can request deletion at any time by writing to privacy@quillstudy.app.</p>",
    },
    PageResponse {
        slug: "terms",
        title: "Terms of Service",
        html: "<h1>Terms of Service</h1>\
            <p>By using Quill you agree to use it for personal study purposes and not to \
            redistribute generated content commercially without permission.</p>\
            <p>The service is provided as-is; we work hard to keep it reliable but make no \
            uptime guarantees for the free tier.</p>",
    },
    PageResponse {
        slug: "support",
        title: "Support",
        html: "<h1>Support</h1>\
            <p>Stuck on something? Email support@quillstudy.app and a human will get back to you \
            within two business days.</p>\
            <p>For billing issues include the email address on your subscription.</p>",
    },
    PageResponse {
        slug: "science",
        title: "The Science",
        html: "<h1>The Science Behind Quill</h1>\
            <p>Quill schedules reviews with spaced repetition and builds questions with active \
            recall, the two most robust findings in learning research.</p>\
            <p>Instead of rereading notes, you retrieve answers right before you would forget \
            them, which is where durable memory is made.</p>",
    },
];

/// One of the fixed site pages by slug.
///
/// GET /api/pages/{slug}
pub async fn get_page(path: web::Path<String>) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let page = PAGES
        .iter()
        .find(|p| p.slug == slug)
        .ok_or_else(|| AppError::NotFound(format!("No page named {}", slug)))?;
    Ok(HttpResponse::Ok().json(page))
}
