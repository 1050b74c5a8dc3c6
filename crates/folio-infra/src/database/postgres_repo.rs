//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, Unchanged,
};
use uuid::Uuid;

use folio_core::domain::{EntryDraft, PortfolioEntry, Post, PostDraft, PostFilter, Session, User};
use folio_core::error::RepoError;
use folio_core::ports::{PortfolioRepository, PostRepository, SessionRepository, UserRepository};

use super::entity::portfolio::{self, Entity as PortfolioEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::session::{self, Entity as SessionEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::PostgresBaseRepository;
use super::store::Collection;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL portfolio repository.
pub type PostgresPortfolioRepository = PostgresBaseRepository<PortfolioEntity>;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL session repository.
pub type PostgresSessionRepository = PostgresBaseRepository<SessionEntity>;

/// Escape LIKE metacharacters so user input matches literally.
pub(crate) fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, draft: PostDraft, created_at: DateTime<Utc>) -> Result<Post, RepoError> {
        let post = Post::from_draft(Uuid::new_v4(), draft, created_at);
        let model = self
            .bounded(post::ActiveModel::from(post).insert(self.db()))
            .await?;

        tracing::debug!(
            collection = Collection::Posts.name(),
            post_id = %model.id,
            "Post created"
        );
        Ok(model.into())
    }

    async fn find_all(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let mut query = PostEntity::find();

        if let Some(prefix) = filter.title_prefix.as_deref() {
            let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(post::Column::Title)))
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        let rows = self
            .bounded(query.order_by_desc(post::Column::CreatedAt).all(self.db()))
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, draft: PostDraft) -> Result<Post, RepoError> {
        let changes = post::ActiveModel {
            id: Unchanged(id),
            title: Set(draft.title),
            body: Set(draft.body),
            synopsis: Set(draft.synopsis),
            cover_image: Set(draft.cover_image),
            ..Default::default()
        };

        // RETURNING gives back the full stored row, counters and date included.
        let model = self.bounded(changes.update(self.db())).await?;

        tracing::debug!(
            collection = Collection::Posts.name(),
            post_id = %id,
            "Post updated"
        );
        Ok(model.into())
    }

    async fn increment_likes(&self, id: Uuid) -> Result<Post, RepoError> {
        let rows = self
            .bounded(
                PostEntity::update_many()
                    .col_expr(post::Column::Likes, Expr::col(post::Column::Likes).add(1))
                    .filter(post::Column::Id.eq(id))
                    .exec_with_returning(self.db()),
            )
            .await?;

        rows.into_iter()
            .next()
            .map(Into::into)
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PortfolioRepository for PostgresPortfolioRepository {
    async fn insert(
        &self,
        draft: EntryDraft,
        created_at: DateTime<Utc>,
    ) -> Result<PortfolioEntry, RepoError> {
        let entry = PortfolioEntry::from_draft(Uuid::new_v4(), draft, created_at);
        let model = self
            .bounded(portfolio::ActiveModel::from(entry).insert(self.db()))
            .await?;

        tracing::debug!(
            collection = Collection::Portfolio.name(),
            entry_id = %model.id,
            "Portfolio entry created"
        );
        Ok(model.into())
    }

    async fn find_all(&self) -> Result<Vec<PortfolioEntry>, RepoError> {
        let rows = self
            .bounded(
                PortfolioEntity::find()
                    .order_by_desc(portfolio::Column::CreatedAt)
                    .all(self.db()),
            )
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, draft: EntryDraft) -> Result<PortfolioEntry, RepoError> {
        let changes = portfolio::ActiveModel {
            id: Unchanged(id),
            title: Set(draft.title),
            repo: Set(draft.repo),
            url: Set(draft.url),
            cover_image: Set(draft.cover_image),
            ..Default::default()
        };

        let model = self.bounded(changes.update(self.db())).await?;
        Ok(model.into())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, RepoError> {
        let model = self
            .bounded(
                user::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    username: Set(username.to_string()),
                    password_hash: Set(password_hash.to_string()),
                }
                .insert(self.db()),
            )
            .await?;

        tracing::info!(user_id = %model.id, "User registered");
        Ok(model.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        // Only the first character goes to the logs.
        let masked = username
            .chars()
            .next()
            .map(|c| format!("{c}***"))
            .unwrap_or_else(|| "***".to_string());
        tracing::debug!(username = %masked, "Finding user by username");

        let result = self
            .bounded(
                UserEntity::find()
                    .filter(user::Column::Username.eq(username))
                    .one(self.db()),
            )
            .await?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn insert(&self, session: Session) -> Result<(), RepoError> {
        let user_id = session.user_id;
        self.bounded(
            SessionEntity::insert(session::ActiveModel::from(session))
                .exec_without_returning(self.db()),
        )
        .await?;

        tracing::debug!(collection = Collection::Sessions.name(), %user_id, "Session stored");
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, RepoError> {
        let result = self
            .bounded(SessionEntity::find_by_id(token.to_string()).one(self.db()))
            .await?;

        Ok(result.map(Into::into))
    }
}
