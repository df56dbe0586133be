use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use databrowse_core::config_file;
use tracing_subscriber::EnvFilter;

mod error;
mod form;
mod handlers;
mod state;
mod store;
mod template;

use state::AppState;
use store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Resolve configuration: env vars > config file > defaults
    let config = config_file::load_config();
    let db_path = std::env::var("DATABROWSE_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config.database_path());
    let addr: SocketAddr = std::env::var("DATABROWSE_ADDR")
        .unwrap_or_else(|_| config.bind_addr())
        .parse()
        .context("invalid bind address")?;
    let static_dir = std::env::var("DATABROWSE_STATIC")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config.static_dir());
    let seed_path = std::env::var("DATABROWSE_SEED")
        .ok()
        .map(PathBuf::from)
        .or_else(|| config.seed_path());

    let store = Store::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;
    tracing::info!(path = %db_path.display(), "database opened");

    if let Some(seed) = seed_path
        && store.is_empty()?
    {
        let sql = std::fs::read_to_string(&seed)
            .with_context(|| format!("failed to read seed script {}", seed.display()))?;
        store.load_sql(&sql)?;
        tracing::info!(path = %seed.display(), "seeded empty database");
    }

    if !static_dir.exists() {
        tracing::warn!(
            path = %static_dir.display(),
            "static directory not found; build the wasm package into it"
        );
    }

    let state = Arc::new(AppState::new(store));
    let app = handlers::router(state, &static_dir);

    tracing::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
