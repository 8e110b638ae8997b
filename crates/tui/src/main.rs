mod app;

use std::fs::{self, OpenOptions};

use anyhow::{Context, Result};
use gamelist_core::{
    catalog::Catalog,
    config::{self, AppConfig},
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config_path = config::ensure_default_config()?;
    let config = AppConfig::load()?;
    info!(path = %config_path.display(), "Using configuration file");

    let catalog = match config.catalog_path.as_ref() {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog override {}", path.display()))?,
        None => Catalog::bundled().context("failed to parse bundled catalog")?,
    };

    let mut app = app::GameListApp::new(catalog, &config);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("gamelist.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout belongs to the terminal UI, so only the file receives events.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(std::sync::Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
