//! Filesystem-backed object storage.
//!
//! Objects live under `<root>/<folder>/<file_name>` and are published at
//! `<public_url>/<folder>/<file_name>`. While an upload streams in, bytes go to
//! its own `<root>/.tmp/<uuid>.partial` file, outside every object folder. The
//! final name only appears after the data is flushed and synced, through a
//! hard link that fails if the key is already taken. A failed or abandoned
//! upload removes its partial file, so a returned URL never points at a
//! truncated or mixed object.

use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use url::Url;
use uuid::Uuid;

use crate::domain::storage::{ObjectStorage, StoredObject, UploadRequest};
use crate::error::ExportError;

/// Staging directory for in-progress uploads, relative to the storage root.
pub const STAGING_DIR: &str = ".tmp";

/// Object storage on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    public_url: Url,
}

impl LocalObjectStorage {
    /// Creates a storage rooted at `root`, publishing objects under `public_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `public_url` is not an absolute URL usable as a base.
    pub fn new(root: impl Into<PathBuf>, public_url: &str) -> Result<Self, url::ParseError> {
        let public_url = Url::parse(public_url)?;
        if public_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }

        Ok(Self {
            root: root.into(),
            public_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL for the object at `folder/file_name`.
    ///
    /// Path segments are percent-encoded.
    pub fn object_url(&self, folder: &str, file_name: &str) -> String {
        let mut url = self.public_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(folder).push(file_name);
        }
        url.to_string()
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(&self, request: UploadRequest) -> Result<StoredObject, ExportError> {
        let key = request.key();
        let UploadRequest {
            content_type,
            folder,
            file_name,
            mut body,
        } = request;

        let dir = self.root.join(&folder);
        let staging = self.root.join(STAGING_DIR);
        fs::create_dir_all(&dir).await.map_err(upload_error)?;
        fs::create_dir_all(&staging).await.map_err(upload_error)?;

        let target = dir.join(&file_name);
        let partial = PartialFile::new(staging.join(format!("{}.partial", Uuid::new_v4())));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(partial.path())
            .await
            .map_err(upload_error)?;
        let mut size = 0u64;

        while let Some(chunk) = body.next().await {
            file.write_all(&chunk).await.map_err(upload_error)?;
            size += chunk.len() as u64;
        }

        file.flush().await.map_err(upload_error)?;
        file.sync_all().await.map_err(upload_error)?;
        drop(file);

        fs::hard_link(partial.path(), &target)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    ExportError::Upload(format!("object {key} already exists"))
                }
                _ => upload_error(e),
            })?;
        drop(partial);

        tracing::info!(key = %key, size, content_type = %content_type, "Object stored");

        Ok(StoredObject {
            url: self.object_url(&folder, &file_name),
            key,
            size,
        })
    }

    async fn health_check(&self) -> bool {
        match fs::create_dir_all(&self.root).await {
            Ok(()) => fs::metadata(&self.root)
                .await
                .map(|m| !m.permissions().readonly())
                .unwrap_or(false),
            Err(e) => {
                tracing::warn!(error = %e, root = %self.root.display(), "Storage root unavailable");
                false
            }
        }
    }
}

fn upload_error(e: std::io::Error) -> ExportError {
    ExportError::Upload(e.to_string())
}

/// Removes the staged file on drop.
///
/// Once published, the object is reachable through its own hard link, so the
/// staged name is removed on success as well.
struct PartialFile {
    path: PathBuf,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed staged object"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "Failed to remove staged object")
            }
        }
    }
}
