//! Configuration file loading for the coach server.
//!
//! Settings live in a TOML file (`coach.toml` by default). Every field is
//! optional and a missing file means "all defaults".

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chess_analysis::AnalysisConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::DEFAULT_MAX_SESSIONS;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Main coach server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CoachConfig {
    /// Address the HTTP server listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Path to the UCI engine used as the oracle.
    /// Defaults to "stockfish" (assumes it's in PATH).
    #[serde(default = "default_stockfish_path")]
    pub stockfish_path: String,
    /// Maximum number of engine processes running at once.
    #[serde(default = "default_engine_pool_size")]
    pub engine_pool_size: usize,
    /// Search depth when analysing user moves.
    #[serde(default = "default_depth")]
    pub analysis_depth: u32,
    /// Search depth for the engine's reply moves.
    #[serde(default = "default_depth")]
    pub reply_depth: u32,
    /// Per-query engine timeout in milliseconds.
    #[serde(default = "default_oracle_timeout_ms")]
    pub oracle_timeout_ms: u64,
    /// JSON opening corpus replacing the built-in one.
    #[serde(default)]
    pub openings_path: Option<PathBuf>,
    /// Live sessions kept before the least recently used is evicted.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

fn default_stockfish_path() -> String {
    "stockfish".to_string()
}

fn default_engine_pool_size() -> usize {
    2
}

fn default_depth() -> u32 {
    5
}

fn default_oracle_timeout_ms() -> u64 {
    10_000
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            stockfish_path: default_stockfish_path(),
            engine_pool_size: default_engine_pool_size(),
            analysis_depth: default_depth(),
            reply_depth: default_depth(),
            oracle_timeout_ms: default_oracle_timeout_ms(),
            openings_path: None,
            max_sessions: default_max_sessions(),
        }
    }
}

impl CoachConfig {
    /// Loads the configuration from `path`.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Default location of the configuration file.
    pub fn default_path() -> PathBuf {
        PathBuf::from("coach.toml")
    }

    /// Search depths handed to the move analyzer.
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            depth: self.analysis_depth,
            reply_depth: self.reply_depth,
        }
    }

    /// Per-query engine timeout.
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }
}
