// Main entry point for the jobscout API server

use std::net::SocketAddr;

use anyhow::{Context, Result};
use jobscout_server::{AppState, Config, build_app};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jobscout_core=debug,jobscout_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting jobscout API");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        max_requests = config.governor.max_requests,
        window_secs = config.governor.window.as_secs(),
        page_delay_ms = config.page_delay.as_millis() as u64,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config)?;
    let app = build_app(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Search: http://localhost:{}/api/search?keywords=rust", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
