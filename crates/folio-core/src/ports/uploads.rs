//! Upload storage port.

use async_trait::async_trait;

/// Stores uploaded files outside the database.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Persist `bytes` and return the generated filename to reference it by.
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
