#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::StreamExt;
use link_exporter::application::services::{ExportService, ExportSettings, UrlService};
use link_exporter::domain::entities::{ExportFilter, ExportRow, NewUrl, Url};
use link_exporter::domain::repositories::{
    ExportSource, RowCursor, SortDirection, UrlListFilter, UrlRepository,
};
use link_exporter::domain::storage::{ObjectStorage, StoredObject, UploadRequest};
use link_exporter::error::{AppError, ExportError};
use link_exporter::infrastructure::storage::LocalObjectStorage;
use link_exporter::state::AppState;
use serde_json::json;
use sqlx::PgPool;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use uuid::Uuid;

pub const PUBLIC_URL: &str = "http://localhost:3333/storage";

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

/// `count` rows one second apart, `https://example.com/page-<n>` style.
pub fn sample_urls(count: usize) -> Vec<Url> {
    (0..count)
        .map(|i| {
            Url::new(
                Uuid::new_v4(),
                format!("https://example.com/page-{i:05}"),
                format!("page-{i:05}"),
                i as i64,
                base_time() + Duration::seconds(i as i64),
            )
        })
        .collect()
}

/// Counts what the pipeline did with the cursors a [`MemoryCatalog`] handed out.
#[derive(Debug, Default)]
pub struct CursorProbe {
    pub opened: AtomicUsize,
    pub fetches: AtomicUsize,
    pub closes: AtomicUsize,
    pub drops: AtomicUsize,
}

impl CursorProbe {
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

/// Injected export cursor failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorFailure {
    None,
    /// The export query is rejected before a cursor exists.
    OnOpen,
    /// `next_batch` fails after serving this many batches.
    AfterBatches(usize),
    /// `next_batch` never completes after serving this many batches.
    StallAfterBatches(usize),
}

/// In-memory URL catalog that is both a [`UrlRepository`] and an [`ExportSource`].
pub struct MemoryCatalog {
    urls: Mutex<Vec<Url>>,
    failure: CursorFailure,
    pub probe: Arc<CursorProbe>,
}

impl MemoryCatalog {
    pub fn new(urls: Vec<Url>) -> Self {
        Self::with_failure(urls, CursorFailure::None)
    }

    pub fn with_failure(urls: Vec<Url>, failure: CursorFailure) -> Self {
        Self {
            urls: Mutex::new(urls),
            failure,
            probe: Arc::new(CursorProbe::default()),
        }
    }

    fn matching(&self, search_query: Option<&str>) -> Vec<Url> {
        let needle = search_query.map(str::to_lowercase);
        self.urls
            .lock()
            .unwrap()
            .iter()
            .filter(|u| match &needle {
                Some(n) => u.original_url.to_lowercase().contains(n),
                None => true,
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UrlRepository for MemoryCatalog {
    async fn create(&self, new_url: NewUrl) -> Result<Url, AppError> {
        let mut urls = self.urls.lock().unwrap();
        if urls.iter().any(|u| u.short_url == new_url.short_url) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "urls_short_url_key" }),
            ));
        }

        let created_at = base_time() + Duration::seconds(urls.len() as i64);
        let url = Url::new(
            Uuid::new_v4(),
            new_url.original_url,
            new_url.short_url,
            0,
            created_at,
        );
        urls.push(url.clone());
        Ok(url)
    }

    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<Url>, AppError> {
        Ok(self
            .urls
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.short_url == short_url)
            .cloned())
    }

    async fn list(&self, filter: UrlListFilter) -> Result<Vec<Url>, AppError> {
        let mut urls = self.matching(filter.search_query.as_deref());
        urls.sort_by_key(|u| (u.created_at, u.id));
        if filter.direction == SortDirection::Desc {
            urls.reverse();
        }

        Ok(urls
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn count(&self, search_query: Option<String>) -> Result<i64, AppError> {
        Ok(self.matching(search_query.as_deref()).len() as i64)
    }

    async fn increment_access_count(&self, id: Uuid) -> Result<bool, AppError> {
        let mut urls = self.urls.lock().unwrap();
        match urls.iter_mut().find(|u| u.id == id) {
            Some(url) => {
                url.access_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut urls = self.urls.lock().unwrap();
        let before = urls.len();
        urls.retain(|u| u.id != id);
        Ok(urls.len() < before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl ExportSource for MemoryCatalog {
    async fn open(
        &self,
        filter: &ExportFilter,
        batch_size: usize,
    ) -> Result<Box<dyn RowCursor>, ExportError> {
        if self.failure == CursorFailure::OnOpen {
            return Err(ExportError::Query(
                "relation \"urls\" does not exist".to_string(),
            ));
        }

        let mut urls = self.matching(filter.search_query.as_deref());
        urls.sort_by_key(|u| (u.created_at, u.id));

        self.probe.opened.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MemoryCursor {
            rows: urls.into_iter().map(ExportRow::from).collect(),
            batch_size,
            served: 0,
            finished: false,
            failure: self.failure,
            probe: self.probe.clone(),
        }))
    }
}

struct MemoryCursor {
    rows: VecDeque<ExportRow>,
    batch_size: usize,
    served: usize,
    finished: bool,
    failure: CursorFailure,
    probe: Arc<CursorProbe>,
}

#[async_trait]
impl RowCursor for MemoryCursor {
    async fn next_batch(&mut self) -> Result<Option<Vec<ExportRow>>, ExportError> {
        if self.finished {
            return Ok(None);
        }

        self.probe.fetches.fetch_add(1, Ordering::SeqCst);

        match self.failure {
            CursorFailure::AfterBatches(n) if self.served == n => {
                return Err(ExportError::Query("connection reset by peer".to_string()));
            }
            CursorFailure::StallAfterBatches(n) if self.served == n => {
                std::future::pending::<()>().await;
            }
            _ => {}
        }

        let take = self.batch_size.min(self.rows.len());
        if take == 0 {
            self.finished = true;
            return Ok(None);
        }

        self.served += 1;
        Ok(Some(self.rows.drain(..take).collect()))
    }

    async fn close(&mut self) -> Result<(), ExportError> {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
        self.finished = true;
        Ok(())
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        self.probe.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Keeps uploaded objects in memory; an object only appears once its body
/// stream ended cleanly.
#[derive(Default)]
pub struct MemoryStorage {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub uploads: AtomicUsize,
}

impl MemoryStorage {
    pub fn object(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|b| String::from_utf8(b.clone()).unwrap())
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().unwrap().is_empty()
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, mut request: UploadRequest) -> Result<StoredObject, ExportError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        let key = request.key();

        let mut data = Vec::new();
        while let Some(chunk) = request.body.next().await {
            data.extend_from_slice(&chunk);
        }

        let size = data.len() as u64;
        self.objects.lock().unwrap().insert(key.clone(), data);

        Ok(StoredObject {
            url: format!("memory://{key}"),
            key,
            size,
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Rejects the write once more than `fail_after` bytes have arrived.
pub struct FailingStorage {
    fail_after: u64,
    pub received: AtomicU64,
}

impl FailingStorage {
    pub fn new(fail_after: u64) -> Self {
        Self {
            fail_after,
            received: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl ObjectStorage for FailingStorage {
    async fn upload(&self, mut request: UploadRequest) -> Result<StoredObject, ExportError> {
        while let Some(chunk) = request.body.next().await {
            let total = self
                .received
                .fetch_add(chunk.len() as u64, Ordering::SeqCst)
                + chunk.len() as u64;
            if total > self.fail_after {
                return Err(ExportError::Upload("quota exceeded".to_string()));
            }
        }

        Err(ExportError::Upload("quota exceeded".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// Reads nothing until `gate` is notified, then behaves like [`MemoryStorage`].
pub struct GatedStorage {
    pub gate: Arc<Notify>,
    pub inner: MemoryStorage,
}

impl GatedStorage {
    pub fn new() -> Self {
        Self {
            gate: Arc::new(Notify::new()),
            inner: MemoryStorage::default(),
        }
    }
}

#[async_trait]
impl ObjectStorage for GatedStorage {
    async fn upload(&self, request: UploadRequest) -> Result<StoredObject, ExportError> {
        self.gate.notified().await;
        self.inner.upload(request).await
    }

    async fn health_check(&self) -> bool {
        true
    }
}

pub fn settings(batch_size: usize, buffer_capacity: usize) -> ExportSettings {
    ExportSettings {
        batch_size,
        buffer_capacity,
        max_rows: None,
    }
}

/// File names under `<root>/reports`, including hidden partial files.
pub fn report_files(root: &Path) -> Vec<String> {
    match std::fs::read_dir(root.join("reports")) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Handler state over an in-memory catalog and filesystem storage at `root`.
pub fn create_memory_state(catalog: Arc<MemoryCatalog>, root: &Path) -> AppState {
    let storage = LocalObjectStorage::new(root, PUBLIC_URL).unwrap();

    let url_service = Arc::new(UrlService::new(catalog.clone()));
    let export_service = Arc::new(ExportService::new(
        catalog,
        Arc::new(storage),
        settings(2, 4),
    ));

    AppState::new(url_service, export_service)
}

pub async fn insert_url(
    pool: &PgPool,
    short_url: &str,
    original_url: &str,
    created_at: DateTime<Utc>,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO urls (original_url, short_url, created_at) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(original_url)
    .bind(short_url)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .unwrap()
}
