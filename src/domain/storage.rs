//! Object storage abstraction used as the export sink.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::error::ExportError;

/// A streaming write into object storage.
///
/// `body` is consumed chunk by chunk; its total length is not known up front.
pub struct UploadRequest {
    pub content_type: String,
    pub folder: String,
    pub file_name: String,
    pub body: BoxStream<'static, Bytes>,
}

impl UploadRequest {
    /// Object key: `folder/file_name`.
    pub fn key(&self) -> String {
        format!("{}/{}", self.folder, self.file_name)
    }
}

/// A durably stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
    pub size: u64,
}

/// Streaming object storage.
///
/// An upload that fails, or whose future is dropped before completion, must
/// not leave an object reachable at the returned URL.
///
/// # Implementations
///
/// - [`crate::infrastructure::storage::LocalObjectStorage`] - filesystem backend
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Consumes `request.body` to completion and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Upload`] if the backend rejects the write.
    async fn upload(&self, request: UploadRequest) -> Result<StoredObject, ExportError>;

    /// Returns true if the backend is reachable and writable.
    async fn health_check(&self) -> bool;
}
