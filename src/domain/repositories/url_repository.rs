//! Repository trait for shortened URL data access.

use crate::domain::entities::{NewUrl, Url};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Ordering applied to listings by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Filter and pagination parameters for listing URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlListFilter {
    pub search_query: Option<String>,
    pub direction: SortDirection,
    pub offset: i64,
    pub limit: i64,
}

impl UrlListFilter {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            search_query: None,
            direction: SortDirection::default(),
            offset,
            limit,
        }
    }

    pub fn with_search(mut self, search_query: Option<String>) -> Self {
        self.search_query = search_query.filter(|q| !q.is_empty());
        self
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }
}

/// Repository interface for managing shortened URLs.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Stores a new shortened URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_url: NewUrl) -> Result<Url, AppError>;

    /// Finds a URL by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<Url>, AppError>;

    /// Lists URLs matching `filter`, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, filter: UrlListFilter) -> Result<Vec<Url>, AppError>;

    /// Counts URLs whose original URL contains `search_query`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self, search_query: Option<String>) -> Result<i64, AppError>;

    /// Atomically adds one to the access counter.
    ///
    /// Returns `Ok(false)` if no URL has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_access_count(&self, id: Uuid) -> Result<bool, AppError>;

    /// Permanently removes a URL.
    ///
    /// Returns `Ok(false)` if no URL has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Round-trips to the store to confirm it is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store does not answer.
    async fn ping(&self) -> Result<(), AppError>;
}
