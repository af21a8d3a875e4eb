//! Tracing subscriber setup

use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize tracing with a compact console format.
///
/// `RUST_LOG` overrides the default filter. Call once during startup; a second
/// call panics because the global subscriber is already set.
pub fn init_telemetry() {
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(console_fmt)
        .init();
}
