//! Application error types and their HTTP representation.
//!
//! - [`AppError`] - errors surfaced to HTTP clients as a JSON body
//! - [`ExportError`] - failures of the CSV export pipeline
//!
//! Every error response has the shape:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Url not found", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// JSON envelope for error responses.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors returned by services and handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable description.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Validation error", details)
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        tracing::error!(error = %e, "Export failed");
        AppError::internal("Export failed", json!({}))
    }
}

/// Failures of the CSV export pipeline.
///
/// Each variant is terminal for the export that produced it; nothing is
/// retried inside the pipeline.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The store rejected or could not serve the export query.
    #[error("export query failed: {0}")]
    Query(String),

    /// The storage backend rejected the write or the stream broke mid-upload.
    #[error("report upload failed: {0}")]
    Upload(String),

    /// A row could not be serialized as CSV.
    #[error("csv encoding failed: {0}")]
    Encode(String),

    /// The export matched more rows than the configured ceiling.
    #[error("export exceeds the limit of {limit} rows")]
    RowLimitExceeded { limit: u64 },
}

impl ExportError {
    /// Short machine-readable label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ExportError::Query(_) => "query",
            ExportError::Upload(_) => "upload",
            ExportError::Encode(_) => "encode",
            ExportError::RowLimitExceeded { .. } => "row_limit",
        }
    }
}

impl From<sqlx::Error> for ExportError {
    fn from(e: sqlx::Error) -> Self {
        ExportError::Query(e.to_string())
    }
}
