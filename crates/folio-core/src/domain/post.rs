use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog article written in markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    /// Markdown source.
    pub body: String,
    pub synopsis: String,
    /// Filename of the cover image inside the upload directory.
    pub cover_image: String,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
    pub comments: i64,
}

impl Post {
    /// Build the stored representation of a freshly created post.
    pub fn from_draft(id: Uuid, draft: PostDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            body: draft.body,
            synopsis: draft.synopsis,
            cover_image: draft.cover_image,
            created_at,
            likes: 0,
            comments: 0,
        }
    }

    /// Creation date as `YYYY-MM-DD`, the format used on listing pages.
    pub fn display_date(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }

    /// Overwrite the editable fields, leaving date and counters alone.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.body = draft.body;
        self.synopsis = draft.synopsis;
        self.cover_image = draft.cover_image;
    }
}

/// The caller-editable fields of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub synopsis: String,
    pub cover_image: String,
}

impl PostDraft {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        synopsis: impl Into<String>,
        cover_image: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            synopsis: synopsis.into(),
            cover_image: cover_image.into(),
        }
    }
}

/// Search filter for posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Case-insensitive title prefix. `None` matches every post.
    pub title_prefix: Option<String>,
}

impl PostFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn title_prefix(prefix: impl Into<String>) -> Self {
        Self {
            title_prefix: Some(prefix.into()),
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        match &self.title_prefix {
            None => true,
            Some(prefix) => post
                .title
                .to_lowercase()
                .starts_with(&prefix.to_lowercase()),
        }
    }
}
