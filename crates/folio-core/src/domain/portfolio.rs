use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Portfolio entry - a showcased project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub id: Uuid,
    pub title: String,
    /// Source repository link.
    pub repo: String,
    /// Live project link.
    pub url: String,
    pub cover_image: String,
    pub created_at: DateTime<Utc>,
}

impl PortfolioEntry {
    pub fn from_draft(id: Uuid, draft: EntryDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            repo: draft.repo,
            url: draft.url,
            cover_image: draft.cover_image,
            created_at,
        }
    }

    pub fn apply(&mut self, draft: EntryDraft) {
        self.title = draft.title;
        self.repo = draft.repo;
        self.url = draft.url;
        self.cover_image = draft.cover_image;
    }
}

/// The caller-editable fields of a portfolio entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub title: String,
    pub repo: String,
    pub url: String,
    pub cover_image: String,
}

impl EntryDraft {
    pub fn new(
        title: impl Into<String>,
        repo: impl Into<String>,
        url: impl Into<String>,
        cover_image: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            repo: repo.into(),
            url: url.into(),
            cover_image: cover_image.into(),
        }
    }
}
