//! Agent orchestration engine entry point: loads `Settings`, spawns MCP
//! servers, wires the engine components, and serves the HTTP API
//! (spec.md §2, §6).

mod config;
mod wiring;

use config::Settings;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let settings = Settings::load()?;
    tracing::info!(bind_addr = %settings.bind_addr, "starting agent orchestrator");

    let state = wiring::build_app_state(&settings).await?;
    let router = conductor_server::create_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!(addr = %settings.bind_addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("failed to listen for Ctrl+C");
    tracing::info!("shutdown signal received");
}
