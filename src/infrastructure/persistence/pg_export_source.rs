//! PostgreSQL server-side cursor for the CSV export.
//!
//! Each export checks a connection out of the pool, opens a transaction and
//! declares a `NO SCROLL` cursor. Batches are read with `FETCH FORWARD`. The
//! connection belongs to the cursor until it is closed or dropped.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use super::pg_url_repository::UrlRecord;
use crate::domain::entities::{ExportFilter, ExportRow, Url};
use crate::domain::repositories::{ExportSource, RowCursor};
use crate::error::ExportError;

const CURSOR_NAME: &str = "url_export";

const DECLARE_SQL: &str = r#"
    DECLARE url_export NO SCROLL CURSOR FOR
    SELECT id, original_url, short_url, access_count, created_at
    FROM urls
    WHERE ($1::text IS NULL OR original_url ILIKE $1)
    ORDER BY created_at ASC, id ASC
"#;

/// Opens PostgreSQL cursors over the `urls` table.
pub struct PgExportSource {
    pool: Arc<PgPool>,
}

impl PgExportSource {
    /// Creates a new export source with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExportSource for PgExportSource {
    async fn open(
        &self,
        filter: &ExportFilter,
        batch_size: usize,
    ) -> Result<Box<dyn RowCursor>, ExportError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(DECLARE_SQL)
            .persistent(false)
            .bind(filter.like_pattern())
            .execute(&mut *tx)
            .await?;

        tracing::debug!(batch_size, "Export cursor declared");

        Ok(Box::new(PgRowCursor {
            tx: Some(tx),
            fetch_sql: format!("FETCH FORWARD {batch_size} FROM {CURSOR_NAME}"),
        }))
    }
}

/// A declared cursor and the transaction holding it.
///
/// `tx` is `None` once the cursor is closed. Dropping an open cursor drops the
/// transaction, which rolls back and returns the connection to the pool.
pub struct PgRowCursor {
    tx: Option<Transaction<'static, Postgres>>,
    fetch_sql: String,
}

#[async_trait]
impl RowCursor for PgRowCursor {
    async fn next_batch(&mut self) -> Result<Option<Vec<ExportRow>>, ExportError> {
        let Some(tx) = self.tx.as_mut() else {
            return Ok(None);
        };

        let records = sqlx::query_as::<_, UrlRecord>(&self.fetch_sql)
            .persistent(false)
            .fetch_all(&mut **tx)
            .await?;

        if records.is_empty() {
            self.close().await?;
            return Ok(None);
        }

        Ok(Some(
            records
                .into_iter()
                .map(|r| ExportRow::from(Url::from(r)))
                .collect(),
        ))
    }

    async fn close(&mut self) -> Result<(), ExportError> {
        let Some(mut tx) = self.tx.take() else {
            return Ok(());
        };

        sqlx::query(&format!("CLOSE {CURSOR_NAME}"))
            .persistent(false)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::debug!("Export cursor closed");
        Ok(())
    }
}
