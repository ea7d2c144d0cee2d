//! In-memory [`Oracle`] for tests.
//!
//! Enabled with the `test-support` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chess_core::Board;

use crate::engine::{EngineError, Oracle, PositionAnalysis};
use crate::evaluation::Evaluation;

/// Oracle answering from a FEN-keyed script.
///
/// Unscripted positions score 0 and recommend the first legal move. Scores
/// are given from the side to move, as a UCI engine reports them.
#[derive(Default)]
pub struct ScriptedOracle {
    script: Mutex<HashMap<String, (Evaluation, Option<String>)>>,
    calls: AtomicUsize,
    fail_after: Option<usize>,
    down: AtomicBool,
}

impl ScriptedOracle {
    /// An oracle whose every query fails.
    pub fn failing() -> Self {
        Self::failing_after(0)
    }

    /// An oracle that answers the first `n` queries and fails the rest.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    /// Scripts the answer for `board`.
    pub fn set(&self, board: &Board, evaluation: Evaluation, best: Option<&str>) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(board.fen(), (evaluation, best.map(str::to_string)));
    }

    /// Makes every query fail (or succeed again) from now on.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Number of queries received, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn evaluate(&self, fen: &str, depth: u32) -> Result<PositionAnalysis, EngineError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) || self.fail_after.is_some_and(|limit| n >= limit) {
            return Err(EngineError::Timeout(Duration::from_millis(10)));
        }

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(fen)
            .cloned();
        let (evaluation, best_move) = match scripted {
            Some(entry) => entry,
            None => {
                let board = Board::from_fen(fen)
                    .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;
                (
                    Evaluation::Centipawn(0),
                    board.legal_moves_uci().into_iter().next(),
                )
            }
        };

        Ok(PositionAnalysis {
            best_move,
            evaluation,
            depth,
            nodes: 1,
            pv: Vec::new(),
        })
    }
}
