//! Export unit and filter types for the CSV export pipeline.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Url;

/// A snapshot of one [`Url`] taken when the export cursor read it.
///
/// Carries exactly the exported columns, in export order. Rows are consumed
/// once by the CSV encoder and have no lifecycle of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub id: Uuid,
    pub original_url: String,
    pub short_url: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Url> for ExportRow {
    fn from(url: Url) -> Self {
        Self {
            id: url.id,
            original_url: url.original_url,
            short_url: url.short_url,
            access_count: url.access_count,
            created_at: url.created_at,
        }
    }
}

/// Narrows which URLs an export includes.
///
/// `search_query` is matched case-insensitively as a substring of
/// `original_url`. It never changes the exported columns or their order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFilter {
    pub search_query: Option<String>,
}

impl ExportFilter {
    pub fn new(search_query: Option<String>) -> Self {
        Self {
            search_query: search_query.filter(|q| !q.is_empty()),
        }
    }

    /// Builds the `ILIKE` pattern for the search query.
    ///
    /// `%`, `_` and `\` are escaped so the query is matched literally.
    pub fn like_pattern(&self) -> Option<String> {
        self.search_query.as_deref().map(|query| {
            let mut pattern = String::with_capacity(query.len() + 2);
            pattern.push('%');
            for c in query.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
    }
}
