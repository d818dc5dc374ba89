use std::sync::Arc;

use crate::application::services::{ExportService, UrlService};

/// Shared handler state, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    pub export_service: Arc<ExportService>,
}

impl AppState {
    pub fn new(url_service: Arc<UrlService>, export_service: Arc<ExportService>) -> Self {
        Self {
            url_service,
            export_service,
        }
    }
}
