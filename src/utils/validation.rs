//! Input validation for shortened URLs.

use crate::error::AppError;
use serde_json::json;

/// Maximum slug length accepted on creation.
pub const MAX_SLUG_LENGTH: usize = 64;

/// Validates a user-provided slug.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: lowercase letters, digits, hyphens
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_slug("my-link-2024").is_ok());
/// assert!(validate_slug("MyLink").is_err());
/// ```
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        return Err(AppError::bad_request(
            format!("Short URL must be 1-{MAX_SLUG_LENGTH} characters"),
            json!({ "provided_length": slug.len() }),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::bad_request(
            "Short URL can only contain lowercase letters, digits, and hyphens",
            json!({ "short_url": slug }),
        ));
    }

    Ok(())
}

/// Validates that `value` is an absolute URL.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the URL cannot be parsed or has no host.
pub fn validate_original_url(value: &str) -> Result<(), AppError> {
    let parsed = url::Url::parse(value).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(AppError::bad_request(
            "URL must be absolute",
            json!({ "url": value }),
        ));
    }

    Ok(())
}
