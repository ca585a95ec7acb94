//! Filesystem-backed blob store for uploaded video files.
//!
//! Files are written once at upload time under a generated name and read
//! back whole at playback; the relational side only ever stores the name.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::StorageConfig;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Empty upload")]
    EmptyUpload,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.upload_path),
        }
    }

    /// Create the uploads directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), MediaError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Persist uploaded bytes under a collision-free name derived from the
    /// client's filename. Returns the stored name for the database row.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::EmptyUpload);
        }

        let stored_name = format!(
            "{}_{}",
            uuid::Uuid::new_v4().simple(),
            sanitize_filename(original_name)
        );
        let destination = self.root.join(&stored_name);

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&destination, bytes).await?;

        info!("Stored upload {:?} ({} bytes)", destination, bytes.len());

        Ok(stored_name)
    }

    /// Absolute path of a stored blob, or None if it is gone from disk.
    pub fn resolve(&self, stored_name: &str) -> Option<PathBuf> {
        let path = self.root.join(stored_name);
        path.exists().then_some(path)
    }

    /// Best-effort removal of a stored blob. A file already missing from
    /// disk is not an error.
    pub async fn remove(&self, stored_name: &str) {
        let path = self.root.join(stored_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!("Removed blob {:?}", path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove blob {:?}: {}", path, e),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Reduce a client-supplied filename to a safe single path component.
fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();

    let trimmed = base.trim_matches(['.', '_']);
    if trimmed.is_empty() {
        "upload.bin".to_string()
    } else {
        trimmed.to_string()
    }
}
