//! Application layer: services implementing business logic.
//!
//! Services consume domain traits and give HTTP handlers and the admin CLI a
//! small, typed API.
//!
//! # Modules
//!
//! - [`services::url_service::UrlService`] - Short URL creation, lookup and counting
//! - [`services::export_service::ExportService`] - Streaming CSV export orchestration
//! - [`export`] - Export pipeline stages (flattening, CSV encoding)

pub mod export;
pub mod services;
