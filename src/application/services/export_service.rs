//! CSV export orchestration.
//!
//! Wires the export stages into one streaming operation:
//!
//! ```text
//! ExportSource cursor ─▶ flatten ─▶ CsvEncoder ─▶ bounded channel ─▶ ObjectStorage
//! ```
//!
//! The read-and-encode side and the upload side run concurrently inside one
//! task. The channel between them is the backpressure boundary: peak memory is
//! bounded by one cursor batch plus `buffer_capacity` encoded chunks, whatever
//! the size of the export.
//!
//! # Failure handling
//!
//! The first error from either side ends the export:
//!
//! - upload fails: the producer is dropped, no further batch is fetched, and
//!   the cursor is closed
//! - query/encoding fails: the upload future is dropped, which makes the
//!   storage backend discard the partial object
//!
//! Dropping the future returned by [`ExportService::export`] (client gone,
//! shutdown, caller deadline) releases the cursor and the in-flight upload the
//! same way.

use std::pin::pin;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::{StreamExt, TryStreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::application::export::{CsvEncoder, flatten};
use crate::domain::entities::ExportFilter;
use crate::domain::repositories::{ExportSource, RowCursor};
use crate::domain::storage::{ObjectStorage, UploadRequest};
use crate::error::ExportError;

/// Storage folder receiving export artifacts.
pub const REPORTS_FOLDER: &str = "reports";

/// MIME type of export artifacts.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Tuning knobs for the export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSettings {
    /// Rows fetched from the cursor per round trip.
    pub batch_size: usize,
    /// Encoded chunks buffered between the encoder and the upload.
    pub buffer_capacity: usize,
    /// Hard ceiling on exported rows. `None` means unbounded.
    pub max_rows: Option<u64>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            batch_size: 100,
            buffer_capacity: 16,
            max_rows: None,
        }
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub report_url: String,
    pub key: String,
    pub rows: u64,
    pub bytes: u64,
}

/// Streams the URL catalog into a CSV artifact in object storage.
pub struct ExportService {
    source: Arc<dyn ExportSource>,
    storage: Arc<dyn ObjectStorage>,
    settings: ExportSettings,
}

impl ExportService {
    /// Creates a new export service.
    pub fn new(
        source: Arc<dyn ExportSource>,
        storage: Arc<dyn ObjectStorage>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            source,
            storage,
            settings,
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Returns true if the storage backend accepts writes.
    pub async fn storage_ready(&self) -> bool {
        self.storage.health_check().await
    }

    /// Exports every URL matching `filter` to `reports/<timestamp>-links.csv`.
    ///
    /// Rows are written in creation order. An empty result still produces a
    /// valid artifact containing only the header line.
    ///
    /// # Errors
    ///
    /// - [`ExportError::Query`] if the query cannot be issued (the storage is
    ///   never touched) or fails mid-stream
    /// - [`ExportError::Upload`] if the storage backend rejects the write
    /// - [`ExportError::Encode`] if a row cannot be serialized
    /// - [`ExportError::RowLimitExceeded`] if `max_rows` is set and exceeded
    ///
    /// No artifact is left behind on any error.
    pub async fn export(&self, filter: ExportFilter) -> Result<ExportReport, ExportError> {
        let started = Instant::now();
        let settings = self.settings;

        tracing::info!(
            search_query = ?filter.search_query,
            batch_size = settings.batch_size,
            "Starting export"
        );

        let mut cursor = self
            .source
            .open(&filter, settings.batch_size)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to open export cursor"))?;

        let (tx, rx) = mpsc::channel::<Bytes>(settings.buffer_capacity);
        let request = UploadRequest {
            content_type: CSV_CONTENT_TYPE.to_string(),
            folder: REPORTS_FOLDER.to_string(),
            file_name: report_file_name(Utc::now()),
            body: ReceiverStream::new(rx).boxed(),
        };
        let key = request.key();

        // try_join! returns on the first error without polling the other side
        // again, so a failed producer never lets the upload see a clean end of
        // stream.
        let outcome = tokio::try_join!(
            produce(cursor.as_mut(), settings, tx),
            self.storage.upload(request),
        );

        if let Err(e) = cursor.close().await {
            tracing::warn!(error = %e, "Failed to close export cursor");
        }

        match outcome {
            Ok((rows, object)) => {
                tracing::info!(
                    rows,
                    bytes = object.size,
                    key = %object.key,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Export completed"
                );

                Ok(ExportReport {
                    report_url: object.url,
                    key: object.key,
                    rows,
                    bytes: object.size,
                })
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = e.kind(),
                    key = %key,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Export failed"
                );
                Err(e)
            }
        }
    }
}

/// Artifact file name for an export started at `at`.
pub fn report_file_name(at: DateTime<Utc>) -> String {
    format!("{}-links.csv", at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Reads the cursor to exhaustion and pushes encoded CSV into `tx`.
///
/// Suspends whenever the channel is full. Returns the number of data rows.
async fn produce(
    cursor: &mut dyn RowCursor,
    settings: ExportSettings,
    tx: mpsc::Sender<Bytes>,
) -> Result<u64, ExportError> {
    let mut encoder = CsvEncoder::new();
    send(&tx, encoder.header()?).await?;

    let mut rows = pin!(flatten::rows(cursor, settings.batch_size));
    let mut written = 0u64;

    while let Some(row) = rows.try_next().await? {
        written += 1;
        if let Some(limit) = settings.max_rows
            && written > limit
        {
            return Err(ExportError::RowLimitExceeded { limit });
        }

        send(&tx, encoder.encode(&row)?).await?;
    }

    tracing::debug!(rows = written, "Export cursor exhausted");
    Ok(written)
}

async fn send(tx: &mpsc::Sender<Bytes>, chunk: Bytes) -> Result<(), ExportError> {
    if chunk.is_empty() {
        return Ok(());
    }

    tx.send(chunk)
        .await
        .map_err(|_| ExportError::Upload("storage stopped reading the report stream".to_string()))
}
