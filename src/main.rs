//! Page editor service binary.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ page router ──▶ page service ──▶ page store
//!                         │                               │          (file | sqlite)
//!     Client Response     │                               ▼
//!     ◀───────────────────┘◀──────────────────────── renderer (templates)
//! ```

use std::path::PathBuf;

use clap::Parser;

use page_editor::config::validation::validate_config;
use page_editor::config::ConfigError;
use page_editor::lifecycle::{spawn_signal_handler, startup, Shutdown};
use page_editor::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "page-editor")]
#[command(about = "Minimal page editing service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = startup::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init(&config.observability.log_level)?;

    tracing::info!("page-editor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = ?config.storage.backend,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    startup::run(config, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
