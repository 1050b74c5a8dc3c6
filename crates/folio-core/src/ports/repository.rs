use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{EntryDraft, PortfolioEntry, Post, PostDraft, PostFilter, Session, User};
use crate::error::RepoError;

/// Lookup and removal shared by every content collection.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. `RepoError::NotFound` when nothing was removed.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// The `posts` collection.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Store a new post; the repository assigns the identifier.
    async fn insert(&self, draft: PostDraft, created_at: DateTime<Utc>) -> Result<Post, RepoError>;

    /// Posts matching `filter`, newest first.
    async fn find_all(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;

    /// Overwrite title, body, synopsis and cover image; returns the stored row.
    async fn update(&self, id: Uuid, draft: PostDraft) -> Result<Post, RepoError>;

    /// Add one like in a single store operation and return the updated row.
    async fn increment_likes(&self, id: Uuid) -> Result<Post, RepoError>;
}

/// The `portfolio` collection.
#[async_trait]
pub trait PortfolioRepository: BaseRepository<PortfolioEntry, Uuid> {
    async fn insert(
        &self,
        draft: EntryDraft,
        created_at: DateTime<Utc>,
    ) -> Result<PortfolioEntry, RepoError>;

    /// All entries, newest first.
    async fn find_all(&self) -> Result<Vec<PortfolioEntry>, RepoError>;

    async fn update(&self, id: Uuid, draft: EntryDraft) -> Result<PortfolioEntry, RepoError>;
}

/// The `users` collection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user. `RepoError::Constraint` if the username is taken.
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// The `sessions` collection.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: Session) -> Result<(), RepoError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, RepoError>;
}
