//! Public reading endpoints: home, blog, portfolio.

use actix_web::{HttpResponse, web};

use folio_shared::dto::{HomeResponse, PostReadingResponse, SearchQuery};

use super::{entry_response, post_response, post_responses};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/home
pub async fn home(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let feed = state.content.home().await?;

    Ok(HttpResponse::Ok().json(HomeResponse {
        posts: post_responses(&feed.posts),
        entries: feed.entries.iter().map(entry_response).collect(),
        featured: feed.featured.as_ref().map(entry_response),
    }))
}

/// GET /api/posts?search=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.content.search_posts(&query.search).await?;
    Ok(HttpResponse::Ok().json(post_responses(&posts)))
}

/// GET /api/posts/{id}
pub async fn read_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let reading = state.content.read_post(&path).await?;
    let html = state.markdown.render(&reading.post.body);

    Ok(HttpResponse::Ok().json(PostReadingResponse {
        post: post_response(&reading.post),
        html,
        more_posts: post_responses(&reading.more_posts),
    }))
}

/// POST /api/posts/{id}/like
pub async fn like_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.content.increment_like(&path).await?;
    Ok(HttpResponse::Ok().json(post_response(&post)))
}

/// GET /api/portfolio
pub async fn list_entries(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let entries = state.content.get_portfolio_entries().await?;
    let body: Vec<_> = entries.iter().map(entry_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/portfolio/{id}
pub async fn get_entry(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let entry = state.content.get_entry(&path).await?;
    Ok(HttpResponse::Ok().json(entry_response(&entry)))
}
