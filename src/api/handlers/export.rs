//! Handler for the CSV export endpoint.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::export::{ExportQuery, ExportResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Streams every matching URL into a CSV report and returns its location.
///
/// # Endpoint
///
/// `POST /urls/exports?searchQuery=example`
///
/// # Response
///
/// ```json
/// { "reportUrl": "http://localhost:3333/storage/reports/2026-01-01T00:00:00.000Z-links.csv" }
/// ```
///
/// The request completes once the artifact is durably stored. If the client
/// disconnects first, the export is abandoned and no artifact is left behind.
///
/// # Errors
///
/// Returns 500 Internal Server Error if the query, encoding or upload fails.
/// The cause is logged, not returned.
pub async fn export_handler(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<ExportResponse>, AppError> {
    let report = state.export_service.export(query.into()).await?;

    Ok(Json(ExportResponse {
        report_url: report.report_url,
    }))
}
