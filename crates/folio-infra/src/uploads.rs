//! Local filesystem storage for cover images and other uploads.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use folio_core::ports::{UploadError, UploadStore};

/// Default upload size cap (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./web/wwwroot/uploads"),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dir),
            max_bytes: std::env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_bytes),
        }
    }
}

/// Writes uploads under a single directory with generated names.
/// Client-supplied names only contribute their extension.
pub struct LocalUploadStore {
    config: UploadConfig,
}

impl LocalUploadStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }
}

/// `.ext` of `name`, lower-cased, or nothing when it is missing or not
/// purely alphanumeric.
fn safe_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Rejected("file is empty".to_string()));
        }
        if bytes.len() > self.config.max_bytes {
            return Err(UploadError::Rejected(format!(
                "file is {} bytes, limit is {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        tokio::fs::create_dir_all(&self.config.dir).await?;

        let filename = format!("{}{}", Uuid::new_v4(), safe_extension(original_name));
        tokio::fs::write(self.config.dir.join(&filename), bytes).await?;

        tracing::debug!(%filename, size = bytes.len(), "Upload stored");
        Ok(filename)
    }
}
