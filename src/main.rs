//! Avatar colour customization server.
//!
//! Serves a base avatar model with per-request material colours as
//! binary glTF (`/avatar.glb`) or glTF JSON (`/avatar.gltf`).
//!
//! # Architecture Overview
//!
//! ```text
//!   GET /avatar.glb?body=%23F7F6F5&hair=545454
//!        │
//!        ▼
//!   ┌─────────┐    ┌─────────┐    ┌──────────────┐    ┌─────────────┐
//!   │  http   │───▶│ params  │───▶│  pipeline    │───▶│   cache     │── hit ──▶ response
//!   │ server  │    │normalize│    │  generate    │    │  (LRU 50)   │
//!   └─────────┘    └────┬────┘    └──────┬───────┘    └─────────────┘
//!                       │ palette        │ miss
//!                       ▼                ▼
//!                  ┌─────────┐    ┌─────────────┐    ┌─────────────┐
//!                  │ palette │    │    model    │───▶│   convert   │──▶ store ──▶ response
//!                  │validator│    │  customize  │    │ glb / gltf  │
//!                  └─────────┘    └─────────────┘    └─────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use avatar_server::config::{load_config, AvatarConfig};
use avatar_server::lifecycle::{bootstrap, Shutdown};
use avatar_server::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "avatar-server")]
#[command(about = "Serves colour-customized avatar models", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override observability.log_level.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AvatarConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }

    logging::init_logging(&config.observability);

    tracing::info!("avatar-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        cache_capacity = config.cache.capacity,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let server = bootstrap(config)?;

    if server.config().observability.metrics_enabled {
        match server.config().observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %server.config().observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
