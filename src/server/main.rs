//! HUC lookup server.
//!
//! Serves `GET /api/huc?lat=..&lng=..&level=..`, resolving points against the
//! configured watershed boundary service with an in-process TTL cache.
//!
//! Environment:
//!   HUC_SERVICE_URL   - upstream query endpoint (`{layer}` is substituted)
//!   HUC_SERVICE_TOKEN - optional upstream access token
//!   RUST_LOG          - log filter (default: info)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hucmap::api::{self, AppState};
use hucmap::config::Config;
use hucmap::HucLookupService;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "HUC lookup server")]
struct Args {
    /// Listen address (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env()?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }

    info!("HUC Lookup Server");
    info!("Upstream: {}", config.upstream.url);
    info!(
        "Cache TTL: {}s, capacity: {}",
        config.cache.ttl_secs,
        config
            .cache
            .max_entries
            .map(|m| m.to_string())
            .unwrap_or_else(|| "unbounded".to_string())
    );

    let service = HucLookupService::from_config(&config)?;
    let state = Arc::new(AppState::new(service));
    let app = api::router(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen))?;
    axum::serve(listener, app).await?;

    Ok(())
}
