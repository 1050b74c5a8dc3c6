//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory store only
//! - `postgres` - PostgreSQL document store via SeaORM
//! - `auth` - Argon2 password hashing
//! - `rate-limit` - Login rate limiting via governor

pub mod auth;
pub mod database;
pub mod markdown;
pub mod memory;
pub mod uploads;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use auth::UuidTokenGenerator;
pub use database::{Collection, StoreConfig};
pub use markdown::PulldownMarkdown;
pub use memory::InMemoryStore;
pub use uploads::{LocalUploadStore, UploadConfig};

#[cfg(feature = "postgres")]
pub use database::DocumentStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, PasswordConfig};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
