//! Bookshelf catalog server
//!
//! Serves the catalog and memory store over HTTP. The catalog lives in
//! SQLite, in memory unless a database path is configured.

use anyhow::{Context, Result};
use bookshelf_core::{init_logging, Catalog, MemoryStore};
use bookshelf_server::{config::ServerConfig, router, AppState};
use log::{error, info, warn};
use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("[FATAL] Failed to load configuration: {err:#}");
            std::process::exit(1);
        }
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("[FATAL] Failed to initialize logging: {err}");
        std::process::exit(1);
    }

    info!(
        "event=server_start module=server status=start version={} pid={}",
        bookshelf_core::core_version(),
        std::process::id()
    );

    if let Err(err) = run_server(config).await {
        error!("event=server_run module=server status=error error={err:#}");
        eprintln!("[FATAL] Server failed: {err:#}");
        std::process::exit(1);
    }
}

async fn run_server(config: ServerConfig) -> Result<()> {
    let catalog = match &config.database_path {
        Some(path) => Catalog::open(path)
            .with_context(|| format!("failed to open catalog at {}", path.display()))?,
        None => Catalog::open_in_memory().context("failed to open in-memory catalog")?,
    };

    if config.seed {
        match catalog.seed_if_empty() {
            Ok(seeded) => info!("event=catalog_seed module=server status=ok seeded={seeded}"),
            // Seeding is best-effort; the server still runs on an empty catalog.
            Err(err) => warn!("event=catalog_seed module=server status=error error={err}"),
        }
    }

    let app = router(AppState::new(catalog, MemoryStore::seeded()));

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("failed to parse bind address `{}`", config.bind_address))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!("event=server_listen module=server status=ok addr={addr}");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
