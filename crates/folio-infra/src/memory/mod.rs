//! In-memory document store - used when no database is configured.
//!
//! Implements every repository port against `HashMap`s behind async `RwLock`s.
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::domain::{EntryDraft, PortfolioEntry, Post, PostDraft, PostFilter, Session, User};
use folio_core::error::RepoError;
use folio_core::ports::{
    BaseRepository, PortfolioRepository, PostRepository, SessionRepository, UserRepository,
};

use crate::database::Collection;

#[derive(Default)]
pub struct InMemoryStore {
    posts: RwLock<HashMap<Uuid, Post>>,
    portfolio: RwLock<HashMap<Uuid, PortfolioEntry>>,
    users: RwLock<HashMap<Uuid, User>>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub async fn count(&self, collection: Collection) -> usize {
        match collection {
            Collection::Posts => self.posts.read().await.len(),
            Collection::Portfolio => self.portfolio.read().await.len(),
            Collection::Users => self.users.read().await.len(),
            Collection::Sessions => self.sessions.read().await.len(),
        }
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert(&self, draft: PostDraft, created_at: DateTime<Utc>) -> Result<Post, RepoError> {
        let post = Post::from_draft(Uuid::new_v4(), draft, created_at);
        self.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_all(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn update(&self, id: Uuid, draft: PostDraft) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.apply(draft);
        Ok(post.clone())
    }

    async fn increment_likes(&self, id: Uuid) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.likes += 1;
        Ok(post.clone())
    }
}

#[async_trait]
impl BaseRepository<PortfolioEntry, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PortfolioEntry>, RepoError> {
        Ok(self.portfolio.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.portfolio
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PortfolioRepository for InMemoryStore {
    async fn insert(
        &self,
        draft: EntryDraft,
        created_at: DateTime<Utc>,
    ) -> Result<PortfolioEntry, RepoError> {
        let entry = PortfolioEntry::from_draft(Uuid::new_v4(), draft, created_at);
        self.portfolio.write().await.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn find_all(&self) -> Result<Vec<PortfolioEntry>, RepoError> {
        let mut entries: Vec<PortfolioEntry> =
            self.portfolio.read().await.values().cloned().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn update(&self, id: Uuid, draft: EntryDraft) -> Result<PortfolioEntry, RepoError> {
        let mut entries = self.portfolio.write().await;
        let entry = entries.get_mut(&id).ok_or(RepoError::NotFound)?;
        entry.apply(draft);
        Ok(entry.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == username) {
            return Err(RepoError::Constraint(format!(
                "username '{username}' already exists"
            )));
        }
        let user = User::new(Uuid::new_v4(), username.to_string(), password_hash.to_string());
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn insert(&self, session: Session) -> Result<(), RepoError> {
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session);
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, RepoError> {
        Ok(self.sessions.read().await.get(token).cloned())
    }
}

#[cfg(test)]
mod tests;
