mod app;
mod config;
mod error;
mod geojson_output;
mod routes;
mod snapshot;

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{app::AppState, config::Config, error::ServerError, snapshot::GraphSnapshot};

/// HTTP service computing isochrones over a road network snapshot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Graph snapshot, overrides `[graph] snapshot`
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Listen address, overrides `[server] bind`
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    run(Cli::parse()).await.map_err(|e| e.to_string())
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(snapshot) = cli.snapshot {
        config.graph.snapshot = Some(snapshot);
    }
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    let path = config
        .graph
        .snapshot
        .clone()
        .ok_or(ServerError::MissingSnapshot)?;
    let road_config = config.graph.road.clone();
    tracing::info!("Loading road graph from {}", path.display());
    let graph = tokio::task::spawn_blocking(move || {
        GraphSnapshot::read(&path)?.into_graph(&road_config)
    })
    .await??;

    let app = app::router(AppState::new(graph, &config), &config);

    let listener = tokio::net::TcpListener::bind(config.server.bind)
        .await
        .map_err(ServerError::Serve)?;
    tracing::info!("Listening on {}", config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
