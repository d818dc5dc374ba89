//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access and are implemented by concrete
//! repositories in `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - Shortened URL CRUD, listing and access counting
//! - [`ExportSource`] / [`RowCursor`] - Batched cursor reads for the CSV export
//!
//! # Testing
//!
//! `UrlRepository` mocks are generated with `mockall`. See integration tests in
//! `tests/repository_*.rs` for usage against PostgreSQL.

pub mod export_source;
pub mod url_repository;

pub use export_source::{ExportSource, RowCursor};
pub use url_repository::{SortDirection, UrlListFilter, UrlRepository};

#[cfg(test)]
pub use url_repository::MockUrlRepository;
