use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use travelgate::config::{DEFAULT_ENV_FILE, load_env_file};
use travelgate::{GatewayConfig, logging, web};

/// HTTP gateway relaying image, geocoding and weather providers
#[derive(Debug, Parser)]
#[command(name = "travelgate", version, about)]
struct Cli {
    /// Path to a TOML config file (defaults to ./travelgate.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind, overrides `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides `server.port`
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Secrets may be kept in ./.env; read it before the config layers
    let env_file = load_env_file(Path::new(DEFAULT_ENV_FILE));

    let mut config = GatewayConfig::load_from_path(cli.config)?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    logging::init(&config.logging)?;

    match env_file {
        Ok(true) => tracing::info!("Loaded environment from {DEFAULT_ENV_FILE}"),
        Ok(false) => {}
        Err(e) => tracing::warn!("{e:#}"),
    }

    web::run(config).await
}
