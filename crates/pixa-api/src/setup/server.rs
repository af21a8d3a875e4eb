//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use pixa_core::Config;
use pixa_registry::EurekaClient;

/// Start the server with graceful shutdown
///
/// Registry registration happens after the listener is bound, so the instance
/// is only advertised once it can accept traffic. A registration failure
/// aborts startup. Deregistration runs after the server loop exits.
pub async fn start_server(
    config: &Config,
    app: Router,
    registry: Option<EurekaClient>,
) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port);
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if let Some(registry) = &registry {
        registry.start().await?;
    }

    let max_image_mb = config.max_file_size_bytes / 1024 / 1024;
    tracing::info!(
        max_image_mb,
        image_extensions = %config.allowed_extensions.join(","),
        upload_dir = %config.upload_dir,
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(registry) = &registry {
        registry.stop().await;
    }

    Ok(())
}

/// Signal handler for graceful shutdown
///
/// Listens for Ctrl+C (SIGINT) and SIGTERM signals to initiate graceful shutdown.
///
/// # Panics
/// - Panics if Ctrl+C signal handler cannot be installed (unrecoverable system error)
/// - On Unix systems, panics if SIGTERM signal handler cannot be installed (unrecoverable system error)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
