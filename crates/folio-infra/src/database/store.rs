#[cfg(feature = "postgres")]
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "postgres")]
use folio_core::RepoError;
#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn};

#[cfg(feature = "postgres")]
use super::postgres_repo::{
    PostgresPortfolioRepository, PostgresPostRepository, PostgresSessionRepository,
    PostgresUserRepository,
};

/// Logical database holding every collection.
pub const DATABASE_NAME: &str = "blog";

/// The logical collections of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Portfolio,
    Users,
    Sessions,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Posts,
        Collection::Portfolio,
        Collection::Users,
        Collection::Sessions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::Portfolio => "portfolio",
            Collection::Users => "users",
            Collection::Sessions => "sessions",
        }
    }
}

/// Connection settings for the document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Bound on establishing the connection and the startup ping.
    pub connect_timeout: Duration,
    /// Bound on every individual data operation.
    pub operation_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: format!("postgres://localhost:5432/{DATABASE_NAME}"),
            max_connections: 20,
            min_connections: 2,
            connect_timeout: Duration::from_secs(10),
            operation_timeout: Duration::from_secs(5),
        }
    }
}

impl StoreConfig {
    /// Read settings from the environment. `None` when `DATABASE_URL` is unset.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let defaults = Self::default();
        Some(Self {
            url,
            max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
            min_connections: env_parse("DB_MIN_CONNECTIONS").unwrap_or(defaults.min_connections),
            connect_timeout: env_parse("DB_CONNECT_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            operation_timeout: env_parse("DB_OPERATION_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.operation_timeout),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Shared handle to the document store.
///
/// Built once by the composition root and handed to each repository. All clones
/// and repositories share one connection pool.
#[cfg(feature = "postgres")]
#[derive(Clone)]
pub struct DocumentStore {
    conn: Arc<DbConn>,
    operation_timeout: Duration,
}

#[cfg(feature = "postgres")]
impl DocumentStore {
    /// Connect and verify liveness with a ping.
    ///
    /// Either step failing (or exceeding `connect_timeout`) is a
    /// `RepoError::Connection`; callers should not serve traffic after that.
    pub async fn connect(config: &StoreConfig) -> Result<Self, RepoError> {
        tracing::info!("Connecting to document store...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .acquire_timeout(config.operation_timeout)
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false)
            .to_owned();

        let conn = tokio::time::timeout(config.connect_timeout, Database::connect(opts))
            .await
            .map_err(|_| {
                RepoError::Connection(format!("connect timed out after {:?}", config.connect_timeout))
            })?
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        tokio::time::timeout(config.connect_timeout, conn.ping())
            .await
            .map_err(|_| {
                RepoError::Connection(format!("ping timed out after {:?}", config.connect_timeout))
            })?
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        tracing::info!(
            database = DATABASE_NAME,
            pool = config.max_connections,
            "Document store connected"
        );

        Ok(Self::from_connection(conn, config.operation_timeout))
    }

    /// Wrap an existing connection (used with SeaORM's mock backend in tests).
    pub fn from_connection(conn: DbConn, operation_timeout: Duration) -> Self {
        Self {
            conn: Arc::new(conn),
            operation_timeout,
        }
    }

    /// Take back the connection once no repository still shares it.
    #[cfg(test)]
    pub(crate) fn into_connection(self) -> Option<DbConn> {
        Arc::try_unwrap(self.conn).ok()
    }

    pub fn posts(&self) -> PostgresPostRepository {
        PostgresPostRepository::new(Arc::clone(&self.conn), self.operation_timeout)
    }

    pub fn portfolio(&self) -> PostgresPortfolioRepository {
        PostgresPortfolioRepository::new(Arc::clone(&self.conn), self.operation_timeout)
    }

    pub fn users(&self) -> PostgresUserRepository {
        PostgresUserRepository::new(Arc::clone(&self.conn), self.operation_timeout)
    }

    pub fn sessions(&self) -> PostgresSessionRepository {
        PostgresSessionRepository::new(Arc::clone(&self.conn), self.operation_timeout)
    }

    /// Liveness probe bounded by the per-operation timeout.
    pub async fn ping(&self) -> Result<(), RepoError> {
        match tokio::time::timeout(self.operation_timeout, self.conn.ping()).await {
            Ok(result) => result.map_err(|e| RepoError::Connection(e.to_string())),
            Err(_) => Err(RepoError::Timeout(self.operation_timeout)),
        }
    }
}
