//! Document store: connection management and collection-scoped repositories.

mod store;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use store::{Collection, DATABASE_NAME, StoreConfig};

#[cfg(feature = "postgres")]
pub use postgres_base::PostgresBaseRepository;
#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresPortfolioRepository, PostgresPostRepository, PostgresSessionRepository,
    PostgresUserRepository,
};
#[cfg(feature = "postgres")]
pub use store::DocumentStore;
