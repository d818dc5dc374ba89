//! Streaming CSV export stages.
//!
//! - [`flatten`] - cursor batches to individual rows
//! - [`csv_encoder`] - rows to CSV byte chunks
//!
//! The stages are wired together, and to the object storage sink, by
//! [`crate::application::services::ExportService`].

pub mod csv_encoder;
pub mod flatten;

pub use csv_encoder::CsvEncoder;
