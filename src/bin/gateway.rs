//! ShareIt Gateway - validates requests and forwards them to the server

use std::net::SocketAddr;

use anyhow::Context;

use shareit::{
    config::AppConfig,
    gateway::{self, GatewayState},
    init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing("shareit", &config.logging);

    tracing::info!(
        "Starting ShareIt Gateway v{} (server at {})",
        env!("CARGO_PKG_VERSION"),
        config.gateway.server_url
    );

    let state = GatewayState::new(&config.gateway).context("Failed to create HTTP client")?;
    let app = gateway::router(state);

    let addr = SocketAddr::new(
        config.gateway.host.parse().context("Invalid host address")?,
        config.gateway.port,
    );

    tracing::info!("Gateway listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
