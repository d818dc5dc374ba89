//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod export;
pub mod health;
pub mod urls;

pub use export::export_handler;
pub use health::health_handler;
pub use urls::{
    create_url_handler, delete_url_handler, get_url_handler, increment_access_handler,
    list_urls_handler,
};
