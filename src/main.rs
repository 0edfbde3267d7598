mod api_doc;
mod app;
mod body;
mod config;
mod error;
mod handlers;
mod heartbeat;
mod models;
mod routes;
mod state;
mod status;
mod store;
#[cfg(test)]
mod testing;

use anyhow::Context;
use config::Config;
use heartbeat::Heartbeat;
use state::AppState;
use std::sync::Arc;
use store::StoreClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("redis-kv-gateway starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store = StoreClient::from_config(&config).context("Invalid Redis connection settings")?;

    // Serving does not wait on the store; a failed connect leaves it degraded.
    let connecting = store.clone();
    tokio::spawn(async move {
        if let Err(e) = connecting.connect().await {
            tracing::error!("Failed to connect to Redis on startup: {}", e);
        }
    });

    let _heartbeat = config
        .redis_heartbeat
        .map(|interval| Heartbeat::start(store.clone(), interval));

    let bind_address = config.bind_address();
    let state = AppState {
        store,
        config: Arc::new(config),
    };
    let app = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Redis demo app listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated with error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
