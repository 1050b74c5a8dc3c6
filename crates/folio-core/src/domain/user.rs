use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - an administrator allowed to manage content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Never serialized outward.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl User {
    pub fn new(id: Uuid, username: String, password_hash: String) -> Self {
        Self {
            id,
            username,
            password_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User::new(Uuid::new_v4(), "admin".into(), "$argon2id$secret".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("admin"));
        assert!(!json.contains("argon2id"));
    }
}
