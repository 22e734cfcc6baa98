use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use forecast_service::{ServiceConfig, logging, web};

/// Forecast service
#[derive(Parser, Debug)]
#[command(name = "forecast-service", version)]
#[command(about = "Serve point forecasts and temperature heatmaps over HTTP")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "FORECAST_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on, overrides the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level, overrides the configuration
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config =
        ServiceConfig::load_from_path(args.config)?.with_overrides(args.port, args.log_level);
    config.validate()?;

    logging::init(&config.logging)?;
    tracing::info!(
        "Starting forecast service {} with model artifact {}",
        forecast_service::VERSION,
        config.model.artifact_path.display()
    );

    web::run(config).await
}
