//! Local file store for product images.
//!
//! Implements the file-store contract: accept bytes plus a filename hint,
//! return a stable relative reference string. The reference is what product
//! create/update accept as `imageUrl`, and what the `/uploads` static
//! service resolves back to a file.

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;

/// Public URL prefix under which stored files are served.
const PUBLIC_PREFIX: &str = "/uploads/products";

/// Stores uploaded files under a local directory with UUID names.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a file store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    /// The directory files are written to (served at [`PUBLIC_PREFIX`]).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Saves a byte stream and returns its relative reference string.
    ///
    /// The stored name is a fresh UUID plus the sanitized extension of the
    /// filename hint, so client-controlled names never touch the
    /// filesystem.
    pub async fn save(&self, filename_hint: Option<&str>, bytes: &[u8]) -> Result<String, ApiError> {
        if bytes.is_empty() {
            return Err(ApiError::Validation("Uploaded file is empty".to_string()));
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to create upload dir: {e}")))?;

        let file_name = match sanitized_extension(filename_hint) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        let path = self.root.join(&file_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store upload: {e}")))?;

        debug!(file = %file_name, size = bytes.len(), "Stored upload");

        Ok(format!("{PUBLIC_PREFIX}/{file_name}"))
    }
}

/// Extracts a safe, lowercase extension from a filename hint.
///
/// Only short alphanumeric extensions survive; anything else is dropped
/// rather than rejected.
fn sanitized_extension(filename_hint: Option<&str>) -> Option<String> {
    let ext = Path::new(filename_hint?).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_extension() {
        assert_eq!(sanitized_extension(Some("photo.PNG")), Some("png".to_string()));
        assert_eq!(sanitized_extension(Some("a.b.jpeg")), Some("jpeg".to_string()));
        assert_eq!(sanitized_extension(Some("no-extension")), None);
        assert_eq!(sanitized_extension(Some("weird.p/n")), None);
        assert_eq!(sanitized_extension(Some("long.extension-too-long")), None);
        assert_eq!(sanitized_extension(None), None);
    }

    #[tokio::test]
    async fn test_save_and_reject_empty() {
        let dir = std::env::temp_dir().join(format!("bazaar-test-{}", Uuid::new_v4()));
        let store = FileStore::new(&dir);

        let url = store.save(Some("lamp.png"), b"not-really-a-png").await.unwrap();
        assert!(url.starts_with("/uploads/products/"));
        assert!(url.ends_with(".png"));

        let stored = dir.join(url.rsplit('/').next().unwrap());
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"not-really-a-png");

        let err = store.save(Some("empty.png"), b"").await;
        assert!(err.is_err());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
