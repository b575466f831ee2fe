//! Quire CLI - publish a folder of Obsidian notes as a static website.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Publish a folder of Obsidian notes as a static website")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default quire.toml and a sample note
    Init {
        /// Directory to initialize
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the site once
    Build {
        /// Directory containing the notes
        source: PathBuf,

        /// Output directory
        output: PathBuf,

        /// Path to quire.toml (bundled defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Build, serve and rebuild on change
    Serve {
        /// Directory containing the notes
        source: PathBuf,

        /// Output directory
        output: PathBuf,

        /// Path to quire.toml (bundled defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Milliseconds between change scans
        #[arg(long, default_value = "1000")]
        interval_ms: u64,

        /// Open the site in a browser
        #[arg(long)]
        open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { dir, yes } => {
            commands::init::run(&dir, yes).await?;
        }
        Commands::Build {
            source,
            output,
            config,
        } => {
            commands::build::run(source, output, config).await?;
        }
        Commands::Serve {
            source,
            output,
            config,
            host,
            port,
            interval_ms,
            open,
        } => {
            let options = commands::serve::ServeOptions {
                host,
                port,
                interval_ms,
                open,
            };
            commands::serve::run(source, output, config, options).await?;
        }
    }

    Ok(())
}
