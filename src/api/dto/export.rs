//! DTOs for the CSV export endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::entities::ExportFilter;

/// Query parameters for `POST /urls/exports`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    /// Case-insensitive substring matched against the original URL.
    #[serde(default)]
    pub search_query: Option<String>,
}

impl From<ExportQuery> for ExportFilter {
    fn from(query: ExportQuery) -> Self {
        ExportFilter::new(query.search_query)
    }
}

/// Response body for a completed export.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub report_url: String,
}
