//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Username/password pair used for both registration and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Create or edit a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostRequest {
    pub title: String,
    /// Markdown source.
    pub body: String,
    pub synopsis: String,
    pub cover_image: String,
}

/// Create or edit a portfolio entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryRequest {
    pub title: String,
    pub repo: String,
    pub url: String,
    pub cover_image: String,
}

/// Markdown preview request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownRequest {
    pub markdown: String,
}

/// `?search=` query on the post listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    pub synopsis: String,
    pub cover_image: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub created_at: String,
    pub likes: i64,
    pub comments: i64,
}

/// A post ready for reading: rendered body plus the rest of the blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostReadingResponse {
    pub post: PostResponse,
    pub html: String,
    pub more_posts: Vec<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResponse {
    pub id: String,
    pub title: String,
    pub repo: String,
    pub url: String,
    pub cover_image: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeResponse {
    pub posts: Vec<PostResponse>,
    pub entries: Vec<EntryResponse>,
    pub featured: Option<EntryResponse>,
}

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub authenticated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
}
