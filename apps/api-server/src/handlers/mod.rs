//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod content;
mod health;

#[cfg(test)]
mod tests;

use actix_web::{HttpRequest, ResponseError, error::JsonPayloadError, web};

use folio_core::domain::{PortfolioEntry, Post};
use folio_shared::dto::{EntryResponse, PostResponse};

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Largest accepted JSON body; post bodies are whole markdown documents.
const JSON_LIMIT: usize = 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/home", web::get().to(content::home))
            .route("/posts", web::get().to(content::list_posts))
            .route("/posts/{id}", web::get().to(content::read_post))
            .route("/posts/{id}/like", web::post().to(content::like_post))
            .route("/portfolio", web::get().to(content::list_entries))
            .route("/portfolio/{id}", web::get().to(content::get_entry))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .service(
                        web::resource("/login")
                            .wrap(RateLimitMiddleware)
                            .route(web::post().to(auth::login)),
                    )
                    .route("/session", web::get().to(auth::session)),
            )
            // Admin routes (session cookie required)
            .service(
                web::scope("/admin")
                    .route("/markdown", web::post().to(admin::markdown_preview))
                    .route("/posts", web::post().to(admin::create_post))
                    .route("/posts/{id}", web::put().to(admin::update_post))
                    .route("/posts/{id}", web::delete().to(admin::delete_post))
                    .route("/portfolio", web::post().to(admin::create_entry))
                    .route("/portfolio/{id}", web::put().to(admin::update_entry))
                    .route("/portfolio/{id}", web::delete().to(admin::delete_entry))
                    .route("/uploads", web::post().to(admin::upload)),
            ),
    );
}

/// JSON extractor settings: larger limit, RFC 7807 errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            let app_error = AppError::BadRequest(err.to_string());
            actix_web::error::InternalError::from_response(err, app_error.error_response()).into()
        })
}

pub(crate) fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title.clone(),
        body: post.body.clone(),
        synopsis: post.synopsis.clone(),
        cover_image: post.cover_image.clone(),
        date: post.display_date(),
        created_at: post.created_at.to_rfc3339(),
        likes: post.likes,
        comments: post.comments,
    }
}

pub(crate) fn post_responses(posts: &[Post]) -> Vec<PostResponse> {
    posts.iter().map(post_response).collect()
}

pub(crate) fn entry_response(entry: &PortfolioEntry) -> EntryResponse {
    EntryResponse {
        id: entry.id.to_string(),
        title: entry.title.clone(),
        repo: entry.repo.clone(),
        url: entry.url.clone(),
        cover_image: entry.cover_image.clone(),
        created_at: entry.created_at.to_rfc3339(),
    }
}
