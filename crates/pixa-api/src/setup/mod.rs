//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use pixa_core::Config;
use pixa_registry::EurekaClient;
use pixa_services::ImageService;
use pixa_storage::{LocalStorage, Storage};

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    // Initialize telemetry first
    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    // Setup storage
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(&config.upload_dir)
            .await
            .context("Failed to initialize local storage")?,
    );

    let image_service = ImageService::new(&config, storage.clone());

    // The registry client is constructed here but registration only happens
    // once the listener is bound, in start_server.
    let registry = if config.eureka_enabled {
        Some(EurekaClient::new(&config).context("Failed to create service registry client")?)
    } else {
        tracing::info!("Service registry integration disabled");
        None
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        image_service,
        storage,
        registry,
    });

    // Setup routes
    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
