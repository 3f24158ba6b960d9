use anyhow::Context;
use clap::Parser;
use jobly_server::{build_app, observability, AppState, ServerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    observability::init();

    let config = ServerConfig::parse();
    if config.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET not set; using development secret");
    }

    let state = AppState::connect(&config)
        .await
        .context("failed to connect to database")?;
    let app = build_app(state);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, "jobly-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("jobly-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
