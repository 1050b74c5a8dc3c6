//! Posts and portfolio entries.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::parse_id;
use crate::domain::{EntryDraft, PortfolioEntry, Post, PostDraft, PostFilter};
use crate::error::{DomainError, RepoError};
use crate::ports::{PortfolioRepository, PostRepository};

/// Number of posts shown on the home page.
pub const HOME_POST_LIMIT: usize = 5;

/// Data behind the landing page.
#[derive(Debug, Clone, Serialize)]
pub struct HomeFeed {
    pub posts: Vec<Post>,
    pub entries: Vec<PortfolioEntry>,
    /// Newest portfolio entry, shown expanded.
    pub featured: Option<PortfolioEntry>,
}

/// A post together with the rest of the blog for the "more posts" list.
#[derive(Debug, Clone, Serialize)]
pub struct PostReading {
    pub post: Post,
    pub more_posts: Vec<Post>,
}

/// Content operations over the `posts` and `portfolio` collections.
pub struct ContentService {
    posts: Arc<dyn PostRepository>,
    portfolio: Arc<dyn PortfolioRepository>,
}

fn missing<'a>(
    entity_type: &'static str,
    id: &'a str,
) -> impl FnOnce(RepoError) -> DomainError + 'a {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}

fn require_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("title is required".to_string()));
    }
    Ok(())
}

impl ContentService {
    pub fn new(posts: Arc<dyn PostRepository>, portfolio: Arc<dyn PortfolioRepository>) -> Self {
        Self { posts, portfolio }
    }

    pub async fn create_post(&self, draft: PostDraft) -> Result<Post, DomainError> {
        require_title(&draft.title)?;
        Ok(self.posts.insert(draft, Utc::now()).await?)
    }

    /// All posts, newest first.
    pub async fn get_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.query_posts(&PostFilter::all()).await
    }

    pub async fn query_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_all(filter).await?)
    }

    /// Title search as typed into the search box. Blank input lists everything.
    pub async fn search_posts(&self, text: &str) -> Result<Vec<Post>, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return self.get_posts().await;
        }
        self.query_posts(&PostFilter::title_prefix(text)).await
    }

    pub async fn get_post(&self, id: &str) -> Result<Post, DomainError> {
        let uuid = parse_id(id)?;
        self.posts
            .find_by_id(uuid)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    pub async fn read_post(&self, id: &str) -> Result<PostReading, DomainError> {
        let post = self.get_post(id).await?;
        let more_posts = self
            .get_posts()
            .await?
            .into_iter()
            .filter(|p| p.id != post.id)
            .collect();
        Ok(PostReading { post, more_posts })
    }

    /// Edits a post in place. The returned value is the row as stored after the
    /// update, counters and date included.
    pub async fn update_post(&self, id: &str, draft: PostDraft) -> Result<Post, DomainError> {
        let uuid = parse_id(id)?;
        require_title(&draft.title)?;
        self.posts.update(uuid, draft).await.map_err(missing("post", id))
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), DomainError> {
        let uuid = parse_id(id)?;
        self.posts.delete(uuid).await.map_err(missing("post", id))
    }

    pub async fn increment_like(&self, id: &str) -> Result<Post, DomainError> {
        let uuid = parse_id(id)?;
        self.posts
            .increment_likes(uuid)
            .await
            .map_err(missing("post", id))
    }

    pub async fn create_portfolio_entry(
        &self,
        draft: EntryDraft,
    ) -> Result<PortfolioEntry, DomainError> {
        require_title(&draft.title)?;
        Ok(self.portfolio.insert(draft, Utc::now()).await?)
    }

    /// All portfolio entries, newest first.
    pub async fn get_portfolio_entries(&self) -> Result<Vec<PortfolioEntry>, DomainError> {
        Ok(self.portfolio.find_all().await?)
    }

    pub async fn get_entry(&self, id: &str) -> Result<PortfolioEntry, DomainError> {
        let uuid = parse_id(id)?;
        self.portfolio
            .find_by_id(uuid)
            .await?
            .ok_or_else(|| DomainError::not_found("portfolio entry", id))
    }

    pub async fn update_entry(
        &self,
        id: &str,
        draft: EntryDraft,
    ) -> Result<PortfolioEntry, DomainError> {
        let uuid = parse_id(id)?;
        require_title(&draft.title)?;
        self.portfolio
            .update(uuid, draft)
            .await
            .map_err(missing("portfolio entry", id))
    }

    pub async fn delete_entry(&self, id: &str) -> Result<(), DomainError> {
        let uuid = parse_id(id)?;
        self.portfolio
            .delete(uuid)
            .await
            .map_err(missing("portfolio entry", id))
    }

    pub async fn home(&self) -> Result<HomeFeed, DomainError> {
        let mut posts = self.get_posts().await?;
        posts.truncate(HOME_POST_LIMIT);
        let entries = self.get_portfolio_entries().await?;
        let featured = entries.first().cloned();
        Ok(HomeFeed {
            posts,
            entries,
            featured,
        })
    }
}
