//! Evaluation oracle: the engine that scores positions and suggests moves.
//!
//! [`Oracle`] is the seam the analyzer talks to. [`UciOracle`] is the
//! production implementation, driving a UCI engine such as Stockfish with a
//! fresh process per query.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::Evaluation;

/// Maximum number of lines to read before giving up on a UCI response.
pub const MAX_UCI_LINES: usize = 10_000;

/// Errors that can occur when working with chess engines.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to spawn or talk to the engine process.
    #[error("Failed to spawn engine: {0}")]
    SpawnError(#[from] std::io::Error),
    /// The engine did not answer in time.
    #[error("Engine timed out after {0:?}")]
    Timeout(Duration),
    /// Engine returned an invalid or unexpected response.
    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),
    /// The oracle has been shut down.
    #[error("Engine pool closed")]
    Closed,
}

/// Result of analyzing a chess position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionAnalysis {
    /// The best move found (in UCI notation, e.g., "e2e4"), or `None` when
    /// the side to move has no legal moves.
    pub best_move: Option<String>,
    /// The position evaluation, from the side to move's point of view.
    pub evaluation: Evaluation,
    /// The search depth reached.
    pub depth: u32,
    /// The number of nodes searched.
    pub nodes: u64,
    /// The principal variation (sequence of best moves).
    pub pv: Vec<String>,
}

/// Something that can score a position and recommend a move.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Searches `fen` to `depth` plies.
    async fn evaluate(&self, fen: &str, depth: u32) -> Result<PositionAnalysis, EngineError>;
}

/// UCI engine oracle.
///
/// Spawns one engine process per query. A semaphore limits how many run at
/// once and every query is bounded by a timeout.
pub struct UciOracle {
    semaphore: Arc<Semaphore>,
    engine_path: String,
    timeout: Duration,
}

impl UciOracle {
    /// Create a new oracle.
    ///
    /// # Arguments
    /// * `engine_path` - Path to the UCI executable
    /// * `pool_size` - Maximum number of concurrent engine processes
    /// * `timeout` - Upper bound for a single query
    pub fn new(engine_path: impl Into<String>, pool_size: usize, timeout: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(pool_size.max(1))),
            engine_path: engine_path.into(),
            timeout,
        }
    }

    /// Get the engine executable path.
    pub fn engine_path(&self) -> &str {
        &self.engine_path
    }

    /// Number of engine processes that could start right now.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    async fn run(&self, fen: &str, depth: u32) -> Result<PositionAnalysis, EngineError> {
        let mut child = Command::new(&self.engine_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::InvalidResponse("engine stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::InvalidResponse("engine stdout unavailable".into()))?;
        let mut reader = BufReader::new(stdout).lines();

        stdin
            .write_all(format!("uci\nisready\nposition fen {fen}\ngo depth {depth}\n").as_bytes())
            .await?;
        stdin.flush().await?;

        let mut info: Option<InfoLine> = None;
        let mut best_move: Option<Option<String>> = None;
        let mut lines_read = 0;
        while let Some(line) = reader.next_line().await? {
            lines_read += 1;
            if lines_read > MAX_UCI_LINES {
                return Err(EngineError::InvalidResponse(
                    "Too many lines without bestmove".to_string(),
                ));
            }
            if line.starts_with("info ") {
                if let Some(parsed) = parse_info_line(&line) {
                    info = Some(parsed);
                }
            } else if line.starts_with("bestmove") {
                best_move = Some(parse_bestmove(&line)?);
                break;
            }
        }

        let _ = stdin.write_all(b"quit\n").await;
        let _ = child.wait().await;

        let best_move = best_move.ok_or_else(|| {
            EngineError::InvalidResponse("Engine closed unexpectedly".to_string())
        })?;
        let info = info.ok_or_else(|| {
            EngineError::InvalidResponse("No score received before bestmove".to_string())
        })?;

        Ok(PositionAnalysis {
            best_move,
            evaluation: info.evaluation,
            depth: info.depth,
            nodes: info.nodes,
            pv: info.pv,
        })
    }
}

#[async_trait]
impl Oracle for UciOracle {
    async fn evaluate(&self, fen: &str, depth: u32) -> Result<PositionAnalysis, EngineError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| EngineError::Closed)?;

        let started = std::time::Instant::now();
        let result = tokio::time::timeout(self.timeout, self.run(fen, depth))
            .await
            .map_err(|_| EngineError::Timeout(self.timeout))?;

        match &result {
            Ok(analysis) => tracing::debug!(
                fen,
                depth,
                duration_ms = started.elapsed().as_millis() as u64,
                best_move = analysis.best_move.as_deref().unwrap_or("(none)"),
                "engine query finished"
            ),
            Err(e) => tracing::warn!(fen, depth, error = %e, "engine query failed"),
        }
        result
    }
}

/// Parsed fields of a UCI `info` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLine {
    pub depth: u32,
    pub evaluation: Evaluation,
    pub nodes: u64,
    pub pv: Vec<String>,
}

/// Parse a UCI info line to extract depth, score, nodes, and PV.
///
/// Format: "info depth X score cp Y nodes Z pv move1 move2 ..."
/// or: "info depth X score mate Y nodes Z pv move1 move2 ..."
///
/// Bound-only scores (`lowerbound`/`upperbound`) are ignored.
pub fn parse_info_line(line: &str) -> Option<InfoLine> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let mut depth: Option<u32> = None;
    let mut cp: Option<i32> = None;
    let mut mate: Option<i32> = None;
    let mut nodes: u64 = 0;
    let mut pv: Vec<String> = Vec::new();
    let mut in_pv = false;

    let mut i = 0;
    while i < parts.len() {
        match parts[i] {
            "depth" if !in_pv => {
                depth = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 1;
            }
            "score" if !in_pv => {
                match parts.get(i + 1).copied() {
                    Some("cp") => cp = parts.get(i + 2).and_then(|s| s.parse().ok()),
                    Some("mate") => mate = parts.get(i + 2).and_then(|s| s.parse().ok()),
                    _ => {}
                }
                i += 2;
            }
            "lowerbound" | "upperbound" if !in_pv => return None,
            "nodes" if !in_pv => {
                nodes = parts.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or(0);
                i += 1;
            }
            "pv" => {
                in_pv = true;
            }
            token => {
                if in_pv {
                    pv.push(token.to_string());
                }
            }
        }
        i += 1;
    }

    let depth = depth?;
    let evaluation = Evaluation::from_uci_score(cp, mate)?;

    Some(InfoLine {
        depth,
        evaluation,
        nodes,
        pv,
    })
}

/// Parse "bestmove e2e4 ponder e7e5". `(none)` means no legal move.
fn parse_bestmove(line: &str) -> Result<Option<String>, EngineError> {
    match line.split_whitespace().nth(1) {
        Some("(none)") | Some("0000") => Ok(None),
        Some(mv) => Ok(Some(mv.to_string())),
        None => Err(EngineError::InvalidResponse(format!(
            "Malformed bestmove line: {line}"
        ))),
    }
}
