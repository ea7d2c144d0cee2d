//! Single-move analysis with move quality classification.
//!
//! This module provides the [`MoveAnalyzer`], which scores one user move
//! against the oracle's recommendation and labels it.

use std::sync::Arc;

use chess_core::{Board, GameOutcome, Move, RulesError};
use chess_openings::BookMatcher;
use serde::Serialize;
use thiserror::Error;

use crate::engine::{EngineError, Oracle};
use crate::evaluation::{Evaluation, MATE_SCORE};
use crate::material::material_balance;
use crate::quality::{MoveAnalysis, MoveQuality};

/// Errors that can occur during move analysis.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Error from the analysis engine.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    /// The engine recommended a move that is not legal in the position.
    #[error("Engine suggested an unusable move: {0}")]
    EngineMove(RulesError),
    /// The engine had no move for a position that still has legal moves.
    #[error("Engine returned no move for {0}")]
    NoBestMove(String),
    /// The move being analyzed could not be applied.
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Configuration for move analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Search depth for scoring positions.
    pub depth: u32,
    /// Search depth for the engine's own reply moves.
    pub reply_depth: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            depth: 5,
            reply_depth: 5,
        }
    }
}

/// Evaluation of a single position, normalized to White's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionEvaluation {
    pub fen: String,
    /// Centipawns with mates folded to `±MATE_SCORE`.
    pub score: i32,
    pub evaluation: Evaluation,
    pub best_move_san: Option<String>,
    pub best_move_uci: Option<String>,
    pub depth: u32,
}

/// A scored position together with the oracle's move, if any.
struct Scored {
    evaluation: Evaluation,
    best_move: Option<Move>,
    depth: u32,
}

impl Scored {
    fn score(&self) -> i32 {
        self.evaluation.to_centipawns()
    }
}

/// Scores user moves against an [`Oracle`].
#[derive(Clone)]
pub struct MoveAnalyzer {
    oracle: Arc<dyn Oracle>,
    config: AnalysisConfig,
}

impl MoveAnalyzer {
    /// Creates a new analyzer over the given oracle.
    pub fn new(oracle: Arc<dyn Oracle>, config: AnalysisConfig) -> Self {
        Self { oracle, config }
    }

    /// Returns the analysis configuration.
    pub fn config(&self) -> AnalysisConfig {
        self.config
    }

    /// Analyzes `mv` played from `before`.
    ///
    /// `log` is the SAN of every move of the game so far. The book matcher is
    /// only consulted once all oracle queries have succeeded, so an error
    /// leaves it as it was.
    ///
    /// # Errors
    ///
    /// Fails if the move is illegal, an oracle query fails, or the oracle
    /// recommends a move that cannot be played.
    pub async fn analyze(
        &self,
        before: &Board,
        mv: &Move,
        log: &[String],
        book: &mut BookMatcher,
    ) -> Result<MoveAnalysis, AnalyzerError> {
        let material_before = material_balance(before);
        let played = before.play(mv)?;
        let material_change = material_balance(&played.board) - material_before;

        let depth = self.config.depth;
        let scored_before = self.score(before, depth).await?;
        let scored_after = self.score(&played.board, depth).await?;
        let positional_change = scored_after.score() - scored_before.score();

        let best = scored_before
            .best_move
            .ok_or_else(|| AnalyzerError::NoBestMove(before.fen()))?;
        let (best_san, score_after_best) = if best == *mv {
            (played.san.clone(), scored_after.score())
        } else {
            let best_played = before.play(&best).map_err(AnalyzerError::EngineMove)?;
            let scored_best = self.score(&best_played.board, depth).await?;
            (best_played.san, scored_best.score())
        };

        let cp_loss = (score_after_best - scored_after.score()).unsigned_abs();
        let book_check = book.check_user_move(log, &played.san);
        let quality = MoveQuality::from_cp_loss(cp_loss, book_check.is_book);

        tracing::debug!(
            san = %played.san,
            best = %best_san,
            cp_loss,
            quality = quality.as_str(),
            "move analyzed"
        );

        Ok(MoveAnalysis {
            san: played.san,
            uci: played.uci,
            best_move_san: Some(best_san),
            material_change,
            positional_change,
            score_before: scored_before.score(),
            score_after: scored_after.score(),
            cp_loss,
            is_book_move: book_check.is_book,
            opening: book_check.opening,
            quality,
        })
    }

    /// Asks the oracle for its move in `board`, searched at the reply depth.
    ///
    /// Returns `None` when the game is already over.
    pub async fn reply_move(&self, board: &Board) -> Result<Option<Move>, AnalyzerError> {
        if board.is_game_over() {
            return Ok(None);
        }
        let scored = self.score(board, self.config.reply_depth).await?;
        scored
            .best_move
            .map(Some)
            .ok_or_else(|| AnalyzerError::NoBestMove(board.fen()))
    }

    /// Evaluates `board` and names the oracle's best move.
    pub async fn evaluate(&self, board: &Board) -> Result<PositionEvaluation, AnalyzerError> {
        let scored = self.score(board, self.config.depth).await?;
        let (best_move_san, best_move_uci) = match &scored.best_move {
            Some(mv) => {
                let played = board.play(mv).map_err(AnalyzerError::EngineMove)?;
                (Some(played.san), Some(played.uci))
            }
            None => (None, None),
        };
        Ok(PositionEvaluation {
            fen: board.fen(),
            score: scored.score(),
            evaluation: scored.evaluation,
            best_move_san,
            best_move_uci,
            depth: scored.depth,
        })
    }

    /// Scores `board` from White's point of view. Finished games are scored
    /// from their outcome without asking the oracle.
    async fn score(&self, board: &Board, depth: u32) -> Result<Scored, AnalyzerError> {
        if let Some(outcome) = board.outcome() {
            let cp = match outcome {
                GameOutcome::WhiteWins => MATE_SCORE,
                GameOutcome::BlackWins => -MATE_SCORE,
                GameOutcome::Draw => 0,
            };
            return Ok(Scored {
                evaluation: Evaluation::Centipawn(cp),
                best_move: None,
                depth: 0,
            });
        }

        let analysis = self.oracle.evaluate(&board.fen(), depth).await?;
        let best_move = analysis
            .best_move
            .as_deref()
            .map(|uci| board.decode_uci(uci))
            .transpose()
            .map_err(AnalyzerError::EngineMove)?;

        Ok(Scored {
            evaluation: analysis.evaluation.for_white(board.side_to_move()),
            best_move,
            depth: analysis.depth,
        })
    }
}
