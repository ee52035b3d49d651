//! One-shot HUC lookup from the command line.
//!
//! Prints the lookup result as JSON, e.g.:
//!   huc --lat 42.2808 --lng -83.7430 --level 10

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hucmap::config::Config;
use hucmap::HucLookupService;

#[derive(Parser, Debug)]
#[command(name = "huc")]
#[command(about = "Resolve a point to its Hydrologic Unit Code")]
struct Args {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: String,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lng: String,

    /// HUC level (8, 10 or 12)
    #[arg(long, default_value = "12")]
    level: String,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env()?;

    let service = HucLookupService::from_config(&config)?;
    let result = service
        .lookup(
            Some(args.lat.as_str()),
            Some(args.lng.as_str()),
            Some(args.level.as_str()),
        )
        .await?;

    let output = if args.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{}", output);

    Ok(())
}
