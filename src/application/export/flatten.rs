//! Batch-to-row flattening for the export pipeline.

use futures::stream::{self, Stream, TryStreamExt};

use crate::domain::entities::ExportRow;
use crate::domain::repositories::RowCursor;
use crate::error::ExportError;

/// Turns a batch cursor into a lazy stream of individual rows.
///
/// Rows come out in cursor order: batch-internal order is kept and batches are
/// never interleaved. Nothing is read from the cursor until the stream is
/// polled, and the cursor stays borrowed (not consumed) so the caller can
/// close it once the stream is gone.
///
/// # Panics
///
/// Panics if the cursor yields a batch longer than `batch_size`. Such a batch
/// means the cursor implementation is broken and the export cannot be trusted.
pub fn rows<C>(
    cursor: &mut C,
    batch_size: usize,
) -> impl Stream<Item = Result<ExportRow, ExportError>> + Send
where
    C: RowCursor + ?Sized,
{
    stream::try_unfold(cursor, |cursor| async move {
        let batch = cursor.next_batch().await?;
        Ok::<_, ExportError>(batch.map(|batch| (batch, cursor)))
    })
    .map_ok(move |batch| {
        assert!(
            batch.len() <= batch_size,
            "malformed batch: cursor returned {} rows with a batch size of {}",
            batch.len(),
            batch_size
        );
        stream::iter(batch.into_iter().map(Ok))
    })
    .try_flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use futures::TryStreamExt;
    use std::collections::VecDeque;
    use uuid::Uuid;

    struct VecCursor {
        batches: VecDeque<Result<Vec<ExportRow>, ExportError>>,
        fetches: usize,
    }

    impl VecCursor {
        fn new(batches: Vec<Result<Vec<ExportRow>, ExportError>>) -> Self {
            Self {
                batches: batches.into(),
                fetches: 0,
            }
        }
    }

    #[async_trait]
    impl RowCursor for VecCursor {
        async fn next_batch(&mut self) -> Result<Option<Vec<ExportRow>>, ExportError> {
            self.fetches += 1;
            self.batches.pop_front().transpose()
        }

        async fn close(&mut self) -> Result<(), ExportError> {
            self.batches.clear();
            Ok(())
        }
    }

    fn row(n: u32) -> ExportRow {
        ExportRow {
            id: Uuid::new_v4(),
            original_url: format!("https://example.com/{n}"),
            short_url: format!("s{n}"),
            access_count: n as i64,
            created_at: Utc.timestamp_opt(1_700_000_000 + n as i64, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_preserves_order_across_batches() {
        let mut cursor = VecCursor::new(vec![
            Ok(vec![row(1), row(2)]),
            Ok(vec![row(3), row(4)]),
            Ok(vec![row(5)]),
        ]);

        let flattened: Vec<ExportRow> = rows(&mut cursor, 2).try_collect().await.unwrap();
        let slugs: Vec<&str> = flattened.iter().map(|r| r.short_url.as_str()).collect();

        assert_eq!(slugs, ["s1", "s2", "s3", "s4", "s5"]);
        // three batches plus the exhausting fetch
        assert_eq!(cursor.fetches, 4);
    }

    #[tokio::test]
    async fn test_empty_cursor_yields_nothing() {
        let mut cursor = VecCursor::new(vec![]);
        let flattened: Vec<ExportRow> = rows(&mut cursor, 2).try_collect().await.unwrap();
        assert!(flattened.is_empty());
    }

    #[tokio::test]
    async fn test_is_lazy() {
        let mut cursor = VecCursor::new(vec![Ok(vec![row(1)])]);
        {
            let _stream = rows(&mut cursor, 2);
        }
        assert_eq!(cursor.fetches, 0);
    }

    #[tokio::test]
    async fn test_error_mid_stream_is_propagated() {
        let mut cursor = VecCursor::new(vec![
            Ok(vec![row(1)]),
            Err(ExportError::Query("connection reset".to_string())),
            Ok(vec![row(2)]),
        ]);

        let mut stream = std::pin::pin!(rows(&mut cursor, 2));
        assert_eq!(stream.try_next().await.unwrap().unwrap().short_url, "s1");
        assert!(matches!(
            stream.try_next().await,
            Err(ExportError::Query(_))
        ));
    }

    #[tokio::test]
    #[should_panic(expected = "malformed batch")]
    async fn test_oversized_batch_panics() {
        let mut cursor = VecCursor::new(vec![Ok(vec![row(1), row(2), row(3)])]);
        let _ = rows(&mut cursor, 2).try_collect::<Vec<_>>().await;
    }
}
