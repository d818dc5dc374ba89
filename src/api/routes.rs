//! API route configuration.

use crate::api::handlers::{
    create_url_handler, delete_url_handler, export_handler, get_url_handler,
    increment_access_handler, list_urls_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Shortened URL routes.
///
/// # Endpoints
///
/// - `POST   /urls`          - Create a shortened URL
/// - `GET    /urls`          - List URLs (paginated, searchable)
/// - `POST   /urls/exports`  - Export matching URLs to a CSV report
/// - `GET    /urls/{key}`    - Resolve a slug
/// - `PATCH  /urls/{key}`    - Increment the access count of a URL id
/// - `DELETE /urls/{key}`    - Delete a URL by id
///
/// `{key}` is the slug for `GET` and the URL id for `PATCH` and `DELETE`.
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_urls_handler).post(create_url_handler))
        .route("/urls/exports", post(export_handler))
        .route(
            "/urls/{key}",
            get(get_url_handler)
                .patch(increment_access_handler)
                .delete(delete_url_handler),
        )
}
