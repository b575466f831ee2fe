//! Serve command: build, serve and rebuild on change.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use quire_server::{QuireServer, ServerConfig};
use quire_static::{BuildConfig, SiteBuilder};

/// Server options from the command line.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    pub interval_ms: u64,
    pub open: bool,
}

/// Run the serve command.
pub async fn run(
    source: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    options: ServeOptions,
) -> Result<()> {
    let builder = SiteBuilder::new(BuildConfig {
        source_dir: source,
        output_dir: output,
        config_path: config,
    });

    // The password is read once; later config edits apply to page content only.
    let site = builder.load_site_config()?;

    let config = ServerConfig {
        host: options.host,
        port: options.port,
        password: site.security.password,
        interval: Duration::from_millis(options.interval_ms.max(1)),
        open: options.open,
    };

    tracing::info!(
        "Starting server on {}:{} (scanning every {}ms)",
        config.host,
        config.port,
        config.interval.as_millis()
    );

    QuireServer::new(config, Arc::new(builder)).start().await?;

    Ok(())
}
