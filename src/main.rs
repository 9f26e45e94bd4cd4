use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use resource_api::app::{self, AppState};
use resource_api::cli::Cli;
use resource_api::config::AppConfig;
use resource_api::database::{
    DatabaseManager, MemoryResourceStore, PgResourceStore, ResourceStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("resource_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    cli.apply(&mut config);
    tracing::info!("Starting resource API in {:?} mode", config.environment);

    let (store, pool) = build_store(&config, cli.in_memory).await?;
    let state = Arc::new(AppState::new(store, &config));
    let app = app::router(state, &config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    if let Some(pool) = pool {
        DatabaseManager::close(pool).await;
    }
    tracing::info!("Server stopped");
    Ok(())
}

async fn build_store(
    config: &AppConfig,
    in_memory: bool,
) -> anyhow::Result<(Arc<dyn ResourceStore>, Option<PgPool>)> {
    if in_memory {
        tracing::warn!("Using in-memory store; resources are lost on exit");
        let store: Arc<dyn ResourceStore> = Arc::new(MemoryResourceStore::new());
        return Ok((store, None));
    }
    if config.database.url.is_none() {
        bail!("no database configured: set DATABASE_URL (or DB_URI), pass --database-url, or run with --in-memory");
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("can't connect to database")?;
    let store = PgResourceStore::new(pool.clone());
    store
        .ensure_schema()
        .await
        .context("can't prepare resources table")?;
    let store: Arc<dyn ResourceStore> = Arc::new(store);
    Ok((store, Some(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
