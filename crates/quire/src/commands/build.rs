//! One-off site build command.

use std::path::PathBuf;

use anyhow::Result;
use quire_static::{BuildConfig, SiteBuilder};

/// Run the build command.
pub async fn run(source: PathBuf, output: PathBuf, config: Option<PathBuf>) -> Result<()> {
    tracing::info!("Building site from {}...", source.display());

    if let Some(path) = &config {
        tracing::info!("Using config {}", path.display());
    }

    let builder = SiteBuilder::new(BuildConfig {
        source_dir: source,
        output_dir: output,
        config_path: config,
    });

    let result = tokio::task::spawn_blocking(move || builder.rebuild_from_config()).await??;

    tracing::info!(
        "Built {} pages in {}ms",
        result.pages.len(),
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
