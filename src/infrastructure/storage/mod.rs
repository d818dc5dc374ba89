//! Object storage backends.
//!
//! - [`LocalObjectStorage`] - filesystem storage with atomic publication

pub mod local_storage;

pub use local_storage::{LocalObjectStorage, STAGING_DIR};
