mod error;
mod handlers;
mod setup;
mod state;
mod telemetry;
mod utils;

use pixa_core::Config;

// Use mimalloc as the global allocator for better performance and lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, services, registry client, routes)
    let (state, router) = crate::setup::initialize_app(config.clone()).await?;

    // Start the server
    crate::setup::server::start_server(&config, router, state.registry.clone()).await?;

    Ok(())
}
