use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod config;
mod session;

use config::Config;
use raincheck_weather::{ForecastCache, ForecastProvider, Geocoder};
use session::Session;

/// Interactive daily rain forecast lookup with a local cache.
#[derive(Parser)]
#[command(name = "raincheck", about = "Daily rain forecast lookup with a local cache")]
struct Cli {
    /// Override the cache file location.
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Load configuration from a specific file instead of the default path.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the prompts.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    if let Some(path) = cli.cache_file {
        config.cache_file = path;
    }

    let cache = ForecastCache::load(&config.cache_file)?;
    let geocoder = Geocoder::with_base_url(&config.user_agent, &config.geocode_url)?;
    let provider = ForecastProvider::with_base_url(&config.forecast_url)?;

    tracing::info!(
        "Starting session with cache at {}",
        config.cache_file.display()
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    Session::new(cache, geocoder, provider)
        .run(&mut input, &mut output)
        .await
}
