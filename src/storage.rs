//! Blob storage seam for uploaded project images.
//!
//! The contract is a hosted object store's: a named binary goes in, a
//! publicly resolvable URL comes out. [`LocalBlobStore`] implements it on a
//! plain directory that the deployment serves statically.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use crate::error::AppError;

/// Named-binary-in, public-URL-out storage contract.
pub trait BlobStore: Send + Sync {
    /// Persist the bytes under a name derived from `file_name` and return
    /// the public URL they will be served from.
    fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, AppError>;
}

/// Blob store writing into a local media directory.
pub struct LocalBlobStore {
    media_dir: PathBuf,
    public_base: String,
}

impl LocalBlobStore {
    pub fn new(media_dir: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            media_dir: media_dir.into(),
            public_base: public_base.into(),
        }
    }
}

impl BlobStore for LocalBlobStore {
    fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, AppError> {
        if file_name.is_empty() {
            return Err(AppError::InvalidInput("File name must not be empty".into()));
        }

        // Millisecond prefix keeps repeated uploads of the same name apart.
        let stored_name = format!(
            "{}_{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(file_name)
        );

        fs::create_dir_all(&self.media_dir)?;
        fs::write(self.media_dir.join(&stored_name), bytes)?;

        Ok(format!(
            "{}/{}",
            self.public_base.trim_end_matches('/'),
            stored_name
        ))
    }
}

/// Replace anything that could escape the media directory or break a URL.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
