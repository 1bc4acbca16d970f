//! Binary crate for the `weather-web` dashboard.
//!
//! Serves a single page with a city search box and a results panel. Each
//! search is one lookup through the shared [`weather_core::WeatherService`].

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use weather_core::{Config, WeatherService};

mod app;
mod page;

#[derive(Debug, Parser)]
#[command(name = "weather-web", version, about = "Weather dashboard web server")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Fail before binding if no API key is configured.
    let config = Config::load()?;
    let service = WeatherService::from_config(&config)?;

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", args.bind))?;
    tracing::info!("weather dashboard listening on http://{}", args.bind);

    axum::serve(listener, app::build_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;

    tracing::info!("weather dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
}
