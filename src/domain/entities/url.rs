//! Url entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A shortened URL with its access counter.
///
/// `short_url` is the slug (lowercase letters, digits and hyphens) and is
/// unique across all stored records. `access_count` only ever grows and
/// `created_at` is assigned once by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Url {
    pub id: Uuid,
    pub original_url: String,
    pub short_url: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Url {
    /// Creates a new Url instance.
    pub fn new(
        id: Uuid,
        original_url: String,
        short_url: String,
        access_count: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_url,
            access_count,
            created_at,
        }
    }
}

/// Input data for creating a new shortened URL.
#[derive(Debug, Clone)]
pub struct NewUrl {
    pub original_url: String,
    pub short_url: String,
}
