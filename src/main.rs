//! movies-api
//!
//! An in-memory movie catalogue served over HTTP with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ metrics ─▶ origin gate ─▶ CORS ─▶ handlers
//!                                                          │                      │
//!                                                     403 if Origin          validate ─▶ store
//!                                                     not allowed                        │
//!     Client Response ◀──────────────────────────────────────────────────── JSON ◀──────┘
//! ```
//!
//! Configuration comes from defaults, an optional TOML file (`--config`), the
//! `PORT` environment variable and `--port`, in increasing precedence.

use clap::Parser;
use std::path::PathBuf;

use movies_api::config::{apply_env_overrides, load_config, validate_config, ConfigError, ServiceConfig};
use movies_api::lifecycle::{self, Shutdown};
use movies_api::observability::logging;

#[derive(Parser)]
#[command(name = "movies-api")]
#[command(about = "In-memory movie catalogue HTTP API", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Seed file to load (overrides config).
    #[arg(long)]
    seed: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    if let Some(port) = args.port {
        config.listener.port = port;
    }
    if let Some(seed) = args.seed {
        config.seed.path = seed;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("movies-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        allowed_origins = ?config.cors.allowed_origins,
        seed = %config.seed.path,
        "Configuration loaded"
    );

    let (server, listener) = lifecycle::start(config).await?;

    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
