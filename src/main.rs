//! Settings Manager (v1)
//!
//! A schema-driven settings service built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────────┐
//!                         │                  SETTINGS MANAGER                 │
//!                         │                                                   │
//!   GET  /settings        │  ┌────────┐    ┌───────────────┐    ┌──────────┐  │
//!   ──────────────────────┼─▶│  http  │───▶│ ConfigService │───▶│  cache   │  │
//!                         │  │ server │    │  read/write   │    │ (1 entry)│  │
//!   POST /settings        │  └────────┘    └───────┬───────┘    └────┬─────┘  │
//!   ──────────────────────┼─▶ auth                 │                 │ miss   │
//!                         │                        ▼                 ▼        │
//!                         │                 ┌──────────────┐    ┌──────────┐  │
//!                         │                 │   sanitize   │    │ storage  │──┼──▶ record
//!                         │                 │  (validate)  │    │ file/mem │  │
//!                         │                 └──────┬───────┘    └──────────┘  │
//!                         │                        ▼                          │
//!                         │                 ┌──────────────┐                  │
//!                         │                 │ SchemaModel  │                  │
//!                         │                 └──────────────┘                  │
//!                         │                                                   │
//!                         │  config · lifecycle · observability · security    │
//!                         └───────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use settings_manager::config::{resolve_config, CONFIG_ENV};
use settings_manager::http::HttpServer;
use settings_manager::lifecycle::{self, signals, Shutdown};
use settings_manager::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "settings-manager")]
#[command(about = "Schema-driven settings service", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = resolve_config(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;

    tracing::info!("settings-manager v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        storage_backend = ?config.storage.backend,
        cache_ttl_secs = config.cache.ttl_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let service = lifecycle::build_service(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    signals::spawn_signal_listener(&shutdown);

    let server = HttpServer::new(&config, service);
    server.run(listener, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
