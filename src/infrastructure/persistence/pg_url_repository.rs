//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{ExportFilter, NewUrl, Url};
use crate::domain::repositories::{SortDirection, UrlListFilter, UrlRepository};
use crate::error::AppError;

/// Row shape shared by every `urls` query.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UrlRecord {
    pub id: Uuid,
    pub original_url: String,
    pub short_url: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UrlRecord> for Url {
    fn from(r: UrlRecord) -> Self {
        Url::new(r.id, r.original_url, r.short_url, r.access_count, r.created_at)
    }
}

const LIST_ASC: &str = r#"
    SELECT id, original_url, short_url, access_count, created_at
    FROM urls
    WHERE ($1::text IS NULL OR original_url ILIKE $1)
    ORDER BY created_at ASC, id ASC
    LIMIT $2 OFFSET $3
"#;

const LIST_DESC: &str = r#"
    SELECT id, original_url, short_url, access_count, created_at
    FROM urls
    WHERE ($1::text IS NULL OR original_url ILIKE $1)
    ORDER BY created_at DESC, id DESC
    LIMIT $2 OFFSET $3
"#;

/// PostgreSQL repository for shortened URLs.
///
/// Uses bound parameters throughout; the search text is escaped before it is
/// turned into an `ILIKE` pattern.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn search_pattern(search_query: Option<String>) -> Option<String> {
    ExportFilter::new(search_query).like_pattern()
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, new_url: NewUrl) -> Result<Url, AppError> {
        let record = sqlx::query_as::<_, UrlRecord>(
            r#"
            INSERT INTO urls (original_url, short_url)
            VALUES ($1, $2)
            RETURNING id, original_url, short_url, access_count, created_at
            "#,
        )
        .bind(&new_url.original_url)
        .bind(&new_url.short_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(record.into())
    }

    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<Url>, AppError> {
        let record = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT id, original_url, short_url, access_count, created_at
            FROM urls
            WHERE short_url = $1
            "#,
        )
        .bind(short_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record.map(Url::from))
    }

    async fn list(&self, filter: UrlListFilter) -> Result<Vec<Url>, AppError> {
        let sql = match filter.direction {
            SortDirection::Asc => LIST_ASC,
            SortDirection::Desc => LIST_DESC,
        };

        let records = sqlx::query_as::<_, UrlRecord>(sql)
            .bind(search_pattern(filter.search_query))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(records.into_iter().map(Url::from).collect())
    }

    async fn count(&self, search_query: Option<String>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM urls WHERE ($1::text IS NULL OR original_url ILIKE $1)",
        )
        .bind(search_pattern(search_query))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn increment_access_count(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE urls SET access_count = access_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM urls WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
