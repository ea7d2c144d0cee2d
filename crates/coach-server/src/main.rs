//! Chess coach server.
//!
//! Serves the coaching API: game sessions with per-move feedback from a UCI
//! engine, opening detection, and a bounded archive of finished games.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chess_analysis::UciOracle;
use chess_openings::{builtin_database, OpeningDatabase};
use clap::Parser;
use coach_server::config::CoachConfig;
use coach_server::{app, AppState};
use tracing_subscriber::EnvFilter;

/// Chess coach server.
#[derive(Parser)]
#[command(name = "coach-server")]
#[command(about = "Serves move feedback, opening detection, and a game archive")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "coach.toml")]
    config: PathBuf,

    /// Listen address, overriding the configuration file
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let config = CoachConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    let openings = match &config.openings_path {
        Some(path) => OpeningDatabase::from_json_file(path)
            .with_context(|| format!("loading openings from {}", path.display()))?,
        None => builtin_database(),
    };
    tracing::info!(openings = openings.len(), "opening corpus loaded");

    let oracle = Arc::new(UciOracle::new(
        config.stockfish_path.clone(),
        config.engine_pool_size,
        config.oracle_timeout(),
    ));
    tracing::info!(
        engine = %config.stockfish_path,
        pool_size = config.engine_pool_size,
        depth = config.analysis_depth,
        "engine oracle configured"
    );

    let state = AppState::new(oracle, Arc::new(openings), config.analysis_config())
        .with_max_sessions(config.max_sessions);

    let addr = args.bind.unwrap_or(config.bind_addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
