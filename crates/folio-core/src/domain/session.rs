use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Login session - an opaque bearer token tied to one user.
///
/// Sessions are never renewed or deleted; once `expires_at` has passed they are
/// simply rejected on lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String, user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            expires_at,
        }
    }

    /// A session is valid strictly before its expiration instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
