//! Vehicle Price EDA - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, AppState, Settings};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load_from(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Settings::load().context("Failed to load settings")?,
    };
    init_logging(&settings.logging);

    info!("=== Vehicle Price EDA v{} ===", env!("CARGO_PKG_VERSION"));

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install metrics recorder")?;

    let state = AppState::from_settings(&settings)
        .context("Failed to load listing dataset")?
        .with_metrics(metrics);

    run_server(&settings.server.addr, state).await?;

    Ok(())
}
