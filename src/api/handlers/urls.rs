//! Handlers for shortened URL management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::ListUrlsQuery;
use crate::api::dto::url::{
    CreateUrlRequest, CreateUrlResponse, ListUrlsResponse, ResolveUrlResponse, UrlItem,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a shortened URL.
///
/// # Endpoint
///
/// `POST /urls`
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com/some/page", "shortUrl": "some-page" }
/// ```
///
/// # Response
///
/// **201 Created**
///
/// ```json
/// { "id": "4f2c0c84-5f7c-4b8e-9f57-0a1c7e0c6a55" }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: malformed URL or slug
/// - **409 Conflict**: slug already taken
pub async fn create_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<CreateUrlResponse>), AppError> {
    payload.validate()?;

    let url = state
        .url_service
        .create_url(payload.original_url, payload.short_url)
        .await?;

    Ok((StatusCode::CREATED, Json(CreateUrlResponse { id: url.id })))
}

/// Lists shortened URLs, newest first by default.
///
/// # Endpoint
///
/// `GET /urls?searchQuery=&sortBy=createdAt&sortDirection=desc&page=1&pageSize=10`
///
/// # Response
///
/// ```json
/// { "urls": [ { "id": "…", "originalUrl": "…", "shortUrl": "…", "accessCount": 0, "createdAt": "…" } ], "total": 1 }
/// ```
pub async fn list_urls_handler(
    State(state): State<AppState>,
    Query(query): Query<ListUrlsQuery>,
) -> Result<Json<ListUrlsResponse>, AppError> {
    let filter = query.into_filter()?;
    let (urls, total) = state.url_service.list_urls(filter).await?;

    Ok(Json(ListUrlsResponse {
        urls: urls.into_iter().map(UrlItem::from).collect(),
        total,
    }))
}

/// Resolves a slug to its destination.
///
/// # Endpoint
///
/// `GET /urls/{shortUrl}`
///
/// # Errors
///
/// Returns 404 Not Found if the slug is unknown.
pub async fn get_url_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ResolveUrlResponse>, AppError> {
    let url = state.url_service.get_by_short_url(&short_url).await?;

    Ok(Json(ResolveUrlResponse {
        id: url.id,
        original_url: url.original_url,
    }))
}

/// Records one access of a shortened URL.
///
/// # Endpoint
///
/// `PATCH /urls/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if no URL has this id.
pub async fn increment_access_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.url_service.increment_access_count(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Permanently deletes a shortened URL.
///
/// # Endpoint
///
/// `DELETE /urls/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if no URL has this id.
pub async fn delete_url_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.url_service.delete_url(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
