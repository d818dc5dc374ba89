//! Shortened URL creation, lookup and bookkeeping.

use std::sync::Arc;

use crate::domain::entities::{NewUrl, Url};
use crate::domain::repositories::{UrlListFilter, UrlRepository};
use crate::error::AppError;
use crate::utils::validation::{validate_original_url, validate_slug};
use serde_json::json;
use uuid::Uuid;

/// Service for creating, resolving and maintaining shortened URLs.
pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
}

impl UrlService {
    /// Creates a new URL service.
    pub fn new(repository: Arc<dyn UrlRepository>) -> Self {
        Self { repository }
    }

    /// Creates a shortened URL with a caller-chosen slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not absolute or the slug
    /// is malformed.
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken.
    pub async fn create_url(&self, original_url: String, short_url: String) -> Result<Url, AppError> {
        validate_original_url(&original_url)?;
        validate_slug(&short_url)?;

        if self
            .repository
            .find_by_short_url(&short_url)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Short URL already exists",
                json!({ "short_url": short_url }),
            ));
        }

        let url = self
            .repository
            .create(NewUrl {
                original_url,
                short_url,
            })
            .await?;

        tracing::info!(id = %url.id, short_url = %url.short_url, "Short URL created");
        Ok(url)
    }

    /// Resolves a slug to its stored URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no URL uses this slug.
    pub async fn get_by_short_url(&self, short_url: &str) -> Result<Url, AppError> {
        self.repository
            .find_by_short_url(short_url)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short URL not found", json!({ "short_url": short_url }))
            })
    }

    /// Returns one page of URLs and the total number of matches.
    ///
    /// Runs the page query and the count query concurrently.
    pub async fn list_urls(&self, filter: UrlListFilter) -> Result<(Vec<Url>, i64), AppError> {
        let search = filter.search_query.clone();
        tokio::try_join!(self.repository.list(filter), self.repository.count(search))
    }

    /// Records one access of a shortened URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no URL has this id.
    pub async fn increment_access_count(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repository.increment_access_count(id).await? {
            return Err(AppError::not_found("Url not found", json!({ "id": id })));
        }
        Ok(())
    }

    /// Deletes a shortened URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no URL has this id.
    pub async fn delete_url(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("Url not found", json!({ "id": id })));
        }

        tracing::info!(%id, "Short URL deleted");
        Ok(())
    }

    /// Checks that the URL store is reachable.
    pub async fn check_database(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}
