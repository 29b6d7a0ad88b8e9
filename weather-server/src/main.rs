//! Binary crate for the weather observation HTTP service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Bootstrapping logging and configuration
//! - Wiring the pipeline into an axum router and serving it

use anyhow::Context;
use clap::Parser;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::EnvFilter;
use weather_core::{
    Config, Pipeline, provider::openweather::OpenWeatherProvider, store::memory::MemoryStore,
};

mod http;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather observation HTTP service")]
struct Args {
    /// Path to a TOML config file; defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address override, e.g. "127.0.0.1:8080".
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("weather_server=info,weather_core=info,tower_http=info")
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    config.ensure_credential()?;

    let provider = Arc::new(OpenWeatherProvider::new(config.provider.clone())?);
    let store = Arc::new(MemoryStore::new());
    let pipeline = Pipeline::new(provider, store);

    let app = http::router(pipeline);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
