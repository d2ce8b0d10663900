use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use carewatch_api::config::{self, StoreBackend};
use carewatch_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use carewatch_api::services::RandomGenerator;
use carewatch_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("carewatch_api=info,tower_http=info")),
        )
        .init();

    let config = config::config().clone();
    config.validate().map_err(anyhow::Error::msg)?;
    info!("Starting CareWatch API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::ensure_schema(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; all data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let bind_addr = config.bind_addr();
    let state = AppState::new(store, Arc::new(RandomGenerator::from_entropy()), config);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("CareWatch API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
