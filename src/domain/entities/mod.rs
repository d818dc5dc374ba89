//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Url`] - A shortened URL mapping with its access counter
//! - [`ExportRow`] - A flattened snapshot of a [`Url`] produced by the export cursor
//! - [`ExportFilter`] - Substring predicate narrowing an export
//!
//! Creation input lives in separate structs (`NewUrl`), following the same
//! pattern as the rest of the crate.

pub mod export_row;
pub mod url;

pub use export_row::{ExportFilter, ExportRow};
pub use url::{NewUrl, Url};
