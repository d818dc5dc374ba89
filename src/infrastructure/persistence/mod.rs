//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain traits using SQLx with bound parameters.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - Shortened URL storage and retrieval
//! - [`PgExportSource`] - Server-side cursor reads for the CSV export

pub mod pg_export_source;
pub mod pg_url_repository;

pub use pg_export_source::PgExportSource;
pub use pg_url_repository::PgUrlRepository;
