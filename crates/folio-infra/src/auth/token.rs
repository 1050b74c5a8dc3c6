//! Opaque session tokens.

use uuid::Uuid;

use folio_core::ports::TokenGenerator;

/// Random v4 UUIDs as session tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTokenGenerator;

impl TokenGenerator for UuidTokenGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
