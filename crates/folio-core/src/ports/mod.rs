//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod markdown;
mod rate_limit;
mod repository;
mod uploads;

pub use auth::{AuthError, PasswordService, TokenGenerator};
pub use markdown::MarkdownRenderer;
pub use rate_limit::{RateLimitResult, RateLimiter};
pub use repository::{
    BaseRepository, PortfolioRepository, PostRepository, SessionRepository, UserRepository,
};
pub use uploads::{UploadError, UploadStore};
