//! Pagination, sorting and search query parameters for `GET /urls`.

use serde::Deserialize;
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::repositories::{SortDirection, UrlListFilter};
use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Column a listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
}

/// Query parameters accepted by the listing endpoint.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUrlsQuery {
    #[serde(default)]
    pub search_query: Option<String>,

    #[serde(default)]
    pub sort_by: Option<SortBy>,

    #[serde(default)]
    pub sort_direction: Option<SortDirectionParam>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Wire form of [`SortDirection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirectionParam {
    Asc,
    Desc,
}

impl From<SortDirectionParam> for SortDirection {
    fn from(value: SortDirectionParam) -> Self {
        match value {
            SortDirectionParam::Asc => SortDirection::Asc,
            SortDirectionParam::Desc => SortDirection::Desc,
        }
    }
}

impl ListUrlsQuery {
    /// Validates paging parameters and converts them into a repository filter.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `pageSize`: 10
    /// - `sortDirection`: `desc`
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` is 0 or `pageSize` is
    /// outside `1..=100`.
    pub fn into_filter(self) -> Result<UrlListFilter, AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "pageSize": page_size }),
            ));
        }

        let offset = i64::from(page - 1) * i64::from(page_size);
        let direction = self.sort_direction.map(Into::into).unwrap_or_default();

        Ok(UrlListFilter::new(offset, i64::from(page_size))
            .with_search(self.search_query)
            .with_direction(direction))
    }
}
