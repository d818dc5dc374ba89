//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository and cursor implementations
//! - [`storage`] - Object storage backends for export artifacts

pub mod persistence;
pub mod storage;
