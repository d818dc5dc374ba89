//! Business logic services for the application layer.

pub mod export_service;
pub mod url_service;

pub use export_service::{ExportReport, ExportService, ExportSettings};
pub use url_service::UrlService;
