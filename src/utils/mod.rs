//! Utility functions shared across layers.
//!
//! - [`validation`] - Slug and original URL validation

pub mod validation;
