//! Domain entities - the core business objects.

mod portfolio;
mod post;
mod session;
mod user;

pub use portfolio::{EntryDraft, PortfolioEntry};
pub use post::{Post, PostDraft, PostFilter};
pub use session::Session;
pub use user::User;
