use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{DbConn, DbErr, EntityTrait, PrimaryKeyTrait, SqlErr};

use folio_core::error::RepoError;
use folio_core::ports::BaseRepository;

/// Generic SeaORM repository scoped to one collection.
///
/// Every call goes through [`PostgresBaseRepository::bounded`], so no single
/// query can hold a request longer than the configured operation timeout.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    db: Arc<DbConn>,
    timeout: Duration,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: Arc<DbConn>, timeout: Duration) -> Self {
        Self {
            db,
            timeout,
            _entity: PhantomData,
        }
    }

    pub(crate) fn db(&self) -> &DbConn {
        &self.db
    }

    /// Run a store operation under the per-call timeout.
    pub(crate) async fn bounded<T, F>(&self, op: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result.map_err(map_db_err),
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Store operation timed out");
                Err(RepoError::Timeout(self.timeout))
            }
        }
    }
}

pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return RepoError::Constraint(detail);
    }
    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: Sync + Send,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + std::fmt::Debug + 'static,
    T: From<E::Model> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = self.bounded(E::find_by_id(id).one(self.db())).await?;
        Ok(result.map(Into::into))
    }

    async fn delete(&self, id: ID) -> Result<(), RepoError> {
        let result = self.bounded(E::delete_by_id(id.clone()).exec(self.db())).await?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::debug!(id = ?id, table = E::default().table_name(), "Document deleted");
        Ok(())
    }
}
