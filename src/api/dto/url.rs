//! DTOs for the shortened URL endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::Url;

/// Compiled regex for slug validation.
static SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// Request body for `POST /urls`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    /// Destination the slug resolves to (absolute URL).
    #[validate(url(message = "Invalid URL format"))]
    pub original_url: String,

    /// Caller-chosen slug.
    #[validate(length(min = 1, max = 64))]
    #[validate(regex(
        path = "*SLUG_REGEX",
        message = "Only lowercase letters, digits and dashes are allowed"
    ))]
    pub short_url: String,
}

/// Response body for `POST /urls`.
#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub id: Uuid,
}

/// Response body for `GET /urls/{shortUrl}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveUrlResponse {
    pub id: Uuid,
    pub original_url: String,
}

/// One entry of a URL listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlItem {
    pub id: Uuid,
    pub original_url: String,
    pub short_url: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Url> for UrlItem {
    fn from(url: Url) -> Self {
        Self {
            id: url.id,
            original_url: url.original_url,
            short_url: url.short_url,
            access_count: url.access_count,
            created_at: url.created_at,
        }
    }
}

/// Response body for `GET /urls`.
#[derive(Debug, Serialize)]
pub struct ListUrlsResponse {
    pub urls: Vec<UrlItem>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::MAX_SLUG_LENGTH;

    fn request(original_url: &str, short_url: &str) -> CreateUrlRequest {
        CreateUrlRequest {
            original_url: original_url.to_string(),
            short_url: short_url.to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("https://example.com/a", "my-link-1").validate().is_ok());
    }

    #[test]
    fn test_invalid_slug_characters() {
        assert!(request("https://example.com", "My_Link").validate().is_err());
        assert!(request("https://example.com", "").validate().is_err());
    }

    #[test]
    fn test_slug_too_long() {
        let slug = "a".repeat(MAX_SLUG_LENGTH + 1);
        assert!(request("https://example.com", &slug).validate().is_err());
    }

    #[test]
    fn test_invalid_original_url() {
        assert!(request("not a url", "slug").validate().is_err());
    }

    #[test]
    fn test_request_uses_camel_case() {
        let json = r#"{"originalUrl": "https://example.com", "shortUrl": "ex"}"#;
        let req: CreateUrlRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.short_url, "ex");
    }

    #[test]
    fn test_list_item_serializes_camel_case() {
        let item = UrlItem {
            id: Uuid::nil(),
            original_url: "https://example.com".to_string(),
            short_url: "ex".to_string(),
            access_count: 3,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["accessCount"], 3);
        assert_eq!(value["originalUrl"], "https://example.com");
        assert!(value.get("createdAt").is_some());
    }
}
