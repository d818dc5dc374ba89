//! Cursor-backed row source for the export pipeline.

use crate::domain::entities::{ExportFilter, ExportRow};
use crate::error::ExportError;
use async_trait::async_trait;

/// Opens export cursors over the URL catalog.
///
/// Every call returns an independent cursor with its own connection; cursors
/// are never shared between exports.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgExportSource`] - PostgreSQL server-side cursor
#[async_trait]
pub trait ExportSource: Send + Sync {
    /// Issues the filtered, ordered export query and returns a cursor over it.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Query`] if the query cannot be issued. This
    /// happens before any batch is produced.
    async fn open(
        &self,
        filter: &ExportFilter,
        batch_size: usize,
    ) -> Result<Box<dyn RowCursor>, ExportError>;
}

/// A lazy, non-restartable sequence of row batches.
///
/// Rows come back ordered by creation time, at most `batch_size` per batch.
/// Once `next_batch` returns `Ok(None)` or `close` has been called the cursor
/// is finished for good.
///
/// Dropping a cursor without closing it must still release its connection.
#[async_trait]
pub trait RowCursor: Send {
    /// Fetches the next batch, or `None` when the result set is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Query`] if the store fails mid-stream.
    async fn next_batch(&mut self) -> Result<Option<Vec<ExportRow>>, ExportError>;

    /// Closes the cursor and releases its connection.
    ///
    /// Safe to call at any point, repeatedly, and after exhaustion.
    async fn close(&mut self) -> Result<(), ExportError>;
}
