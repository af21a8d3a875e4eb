//! Route and middleware wiring

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use pixa_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, image_download, image_upload};
use crate::state::AppState;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/api/images/upload", post(image_upload::upload_image))
        .route(
            "/api/images/{year}/{month}/{day}/{filename}",
            get(image_download::download_image),
        )
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        // The upload pipeline enforces the configured size cap and turns it
        // into a 400. The transport cap sits well above it and only stops
        // unbounded bodies from streaming in.
        .layer(RequestBodyLimitLayer::new(config.max_file_size_bytes * 10))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
