//! Application services - the entry points consumed by the HTTP layer.

mod auth;
mod content;

pub use auth::{AuthService, DEFAULT_SESSION_TTL_HOURS};
pub use content::{ContentService, HomeFeed, PostReading};

use uuid::Uuid;

use crate::error::DomainError;

/// Parse a client-supplied identifier.
pub(crate) fn parse_id(id: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(id.trim()).map_err(|_| DomainError::InvalidIdentifier(id.to_string()))
}
