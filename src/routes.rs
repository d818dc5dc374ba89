//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `/urls/*`     - Shortened URL API and CSV exports
//! - `GET /health` - Health check: database and storage
//! - `/storage/*`  - Exported reports served from the storage root; hidden
//!   entries (staged uploads) are never served
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin, common methods
//! - **Panic recovery** - Panics become 500 responses
//! - **Path normalization** - Trailing slash handling

use std::path::Path;

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `storage_root` - directory whose contents are served under `/storage`
pub fn app_router(state: AppState, storage_root: impl AsRef<Path>) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, storage_root))
}

/// All routes and middleware, without path normalization.
pub fn router(state: AppState, storage_root: impl AsRef<Path>) -> Router {
    Router::new()
        .merge(api::routes::url_routes())
        .route("/health", get(health_handler))
        .nest_service("/storage", storage_service(storage_root.as_ref()))
        .with_state(state)
        .layer(cors_layer())
        .layer(CatchPanicLayer::new())
        .layer(tracing::layer())
}

/// Serves the storage root, answering 404 for any path with a hidden segment.
fn storage_service(root: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(root))
        .layer(middleware::from_fn(hide_dot_paths))
}

async fn hide_dot_paths(request: Request, next: Next) -> Response {
    if request
        .uri()
        .path()
        .split('/')
        .any(is_hidden_segment)
    {
        return StatusCode::NOT_FOUND.into_response();
    }

    next.run(request).await
}

fn is_hidden_segment(segment: &str) -> bool {
    segment.starts_with('.')
        || segment
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("%2e"))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
}
