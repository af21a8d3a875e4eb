//! Application state shared across HTTP handlers

use std::sync::Arc;

use pixa_core::Config;
use pixa_registry::EurekaClient;
use pixa_services::ImageService;
use pixa_storage::Storage;

/// Shared application state
///
/// Built once during startup by [`crate::setup::initialize_app`] and handed to
/// handlers through axum's `State` extractor behind an `Arc`.
pub struct AppState {
    pub config: Config,
    pub image_service: ImageService,
    pub storage: Arc<dyn Storage>,
    /// `None` when registry integration is disabled (`EUREKA_ENABLED=false`).
    pub registry: Option<EurekaClient>,
}
