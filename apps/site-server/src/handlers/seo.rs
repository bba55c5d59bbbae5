//! Sitemap and robots endpoints.

use actix_web::{HttpResponse, web};

use quill_core::domain::Post;

use crate::middleware::error::AppResult;
use crate::state::AppState;

const STATIC_PATHS: [&str; 6] = ["", "/blog", "/privacy", "/terms", "/support", "/science"];

/// Sitemap over the static pages plus every published post.
///
/// GET /sitemap.xml
pub async fn sitemap(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_published().await?;
    let xml = render_sitemap(&state.site.base_url, &posts);
    Ok(HttpResponse::Ok()
        .content_type("application/xml")
        .body(xml))
}

/// GET /robots.txt
pub async fn robots(state: web::Data<AppState>) -> HttpResponse {
    let body = format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\n\nSitemap: {}/sitemap.xml\n",
        state.site.base_url
    );
    HttpResponse::Ok().content_type("text/plain").body(body)
}

fn render_sitemap(base_url: &str, posts: &[Post]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for path in STATIC_PATHS {
        xml.push_str(&format!("  <url><loc>{}{}</loc></url>\n", base_url, path));
    }
    for post in posts {
        xml.push_str(&format!(
            "  <url><loc>{}/blog/{}</loc>{}</url>\n",
            base_url,
            post.slug,
            post.published_at
                .map(|at| format!("<lastmod>{}</lastmod>", at.format("%Y-%m-%d")))
                .unwrap_or_default(),
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}
