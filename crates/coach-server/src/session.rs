//! Per-game session state.
//!
//! A [`GameSession`] owns the live board, the move history, the SAN log of
//! both sides, and the opening matcher for one game. Every mutating
//! operation either succeeds completely or leaves the session untouched.

use std::sync::Arc;

use chess_analysis::{MoveAnalysis, MoveAnalyzer, PlayerStats};
use chess_core::{Board, Color, Move, MoveSpec};
use chess_openings::{BookMatcher, BookStatus, Opening, OpeningDatabase};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::SessionError;

/// One played move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub san: String,
    pub uci: String,
    /// Position the move was played from.
    pub fen_before: String,
}

/// Result of a user move.
#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    pub analysis: MoveAnalysis,
    pub feedback: String,
    /// The engine's answer, recorded but not scored.
    pub reply: Option<MoveRecord>,
    pub fen: String,
    pub game_over: bool,
    pub result: Option<String>,
}

/// Snapshot of a session for clients.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub fen: String,
    pub side_to_move: &'static str,
    pub fullmove_number: u32,
    pub move_count: usize,
    pub game_over: bool,
    pub result: Option<String>,
    pub book: BookStatus,
}

/// Archived form of a session.
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub pgn: String,
    pub moves: Vec<String>,
    pub start_fen: String,
    pub final_fen: String,
    pub result: String,
    pub opening: Option<Opening>,
    pub stats: PlayerStats,
    pub created_at: DateTime<Utc>,
}

/// A single game in progress.
#[derive(Debug, Clone)]
pub struct GameSession {
    corpus: Arc<OpeningDatabase>,
    start: Board,
    board: Board,
    history: Vec<MoveRecord>,
    san_log: Vec<String>,
    analyses: Vec<MoveAnalysis>,
    book: BookMatcher,
    created_at: DateTime<Utc>,
}

impl GameSession {
    /// A new game from the standard starting position.
    pub fn new(corpus: Arc<OpeningDatabase>) -> Self {
        Self {
            book: BookMatcher::new(Arc::clone(&corpus)),
            corpus,
            start: Board::starting(),
            board: Board::starting(),
            history: Vec::new(),
            san_log: Vec::new(),
            analyses: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// SAN of every move played, both sides.
    pub fn san_log(&self) -> &[String] {
        &self.san_log
    }

    pub fn book(&self) -> &BookMatcher {
        &self.book
    }

    /// Analyses of the user's moves, in order.
    pub fn analyses(&self) -> &[MoveAnalysis] {
        &self.analyses
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            fen: self.board.fen(),
            side_to_move: match self.board.side_to_move() {
                Color::White => "white",
                Color::Black => "black",
            },
            fullmove_number: self.board.fullmove_number(),
            move_count: self.history.len(),
            game_over: self.board.is_game_over(),
            result: self.board.outcome().map(|o| o.as_result().to_string()),
            book: self.book.status(),
        }
    }

    /// Plays a user move: analyse it, record it, then let the engine reply.
    ///
    /// The reply is skipped once the game is over. Nothing is committed
    /// unless the analysis and the reply both succeed.
    pub async fn apply_user_move(
        &mut self,
        spec: &MoveSpec,
        analyzer: &MoveAnalyzer,
    ) -> Result<MoveOutcome, SessionError> {
        let mv = self.board.decode(spec)?;

        let mut staged = self.clone();
        let analysis = analyzer
            .analyze(&staged.board, &mv, &staged.san_log, &mut staged.book)
            .await?;
        staged.push(&mv)?;

        let reply = match analyzer.reply_move(&staged.board).await? {
            Some(reply) => Some(staged.push(&reply)?),
            None => None,
        };
        staged.analyses.push(analysis.clone());

        *self = staged;

        let feedback = analysis.feedback();
        tracing::info!(
            san = %analysis.san,
            quality = analysis.quality.as_str(),
            cp_loss = analysis.cp_loss,
            reply = reply.as_ref().map(|r| r.san.as_str()).unwrap_or("-"),
            "user move applied"
        );

        Ok(MoveOutcome {
            analysis,
            feedback,
            reply,
            fen: self.board.fen(),
            game_over: self.board.is_game_over(),
            result: self.board.outcome().map(|o| o.as_result().to_string()),
        })
    }

    /// Replaces the game with `fen` (or the standard start) plus the UCI
    /// moves in `moves` replayed on it.
    ///
    /// History and SAN log are rebuilt from the replay and the book matcher
    /// starts over. Corpus lines are played from the standard start, so a
    /// game set up from any other position is never in book.
    pub fn set_position(&mut self, fen: Option<&str>, moves: &[String]) -> Result<(), SessionError> {
        let start = match fen {
            Some(fen) => Board::from_fen(fen)?,
            None => Board::starting(),
        };

        let mut replayed = Self::new(Arc::clone(&self.corpus));
        replayed.start = start.clone();
        replayed.board = start;
        if !replayed.from_standard_start() {
            replayed.book.deactivate();
        }
        for uci in moves {
            let mv = replayed.board.decode_uci(uci)?;
            replayed.push(&mv)?;
        }

        *self = replayed;
        Ok(())
    }

    /// Starts a fresh game. Board, history, log and book matcher are
    /// replaced together.
    pub fn reset(&mut self) {
        *self = Self::new(Arc::clone(&self.corpus));
    }

    /// The game as PGN.
    pub fn pgn(&self) -> String {
        let result = self.board.result();
        let mut pgn = String::new();
        pgn.push_str("[Event \"Coaching session\"]\n");
        pgn.push_str(&format!(
            "[Date \"{}\"]\n",
            self.created_at.format("%Y.%m.%d")
        ));
        pgn.push_str("[White \"?\"]\n[Black \"?\"]\n");
        pgn.push_str(&format!("[Result \"{result}\"]\n"));
        if self.start.fen() != chess_core::STARTING_FEN {
            pgn.push_str("[SetUp \"1\"]\n");
            pgn.push_str(&format!("[FEN \"{}\"]\n", self.start.fen()));
        }
        pgn.push('\n');
        pgn.push_str(&self.movetext());
        pgn
    }

    /// Numbered movetext ending with the result token.
    fn movetext(&self) -> String {
        let mut number = self.start.fullmove_number();
        let mut white_to_move = self.start.side_to_move() == Color::White;
        let mut tokens = Vec::with_capacity(self.history.len() + 1);

        for (i, record) in self.history.iter().enumerate() {
            if white_to_move {
                tokens.push(format!("{number}. {}", record.san));
            } else {
                if i == 0 {
                    tokens.push(format!("{number}... {}", record.san));
                } else {
                    tokens.push(record.san.clone());
                }
                number += 1;
            }
            white_to_move = !white_to_move;
        }
        tokens.push(self.board.result().to_string());
        tokens.join(" ")
    }

    /// Everything worth keeping about this game.
    pub fn summary(&self) -> GameSummary {
        let opening = if self.from_standard_start() {
            self.corpus.identify(&self.san_log).cloned()
        } else {
            None
        };
        GameSummary {
            pgn: self.pgn(),
            moves: self.san_log.clone(),
            start_fen: self.start.fen(),
            final_fen: self.board.fen(),
            result: self.board.result().to_string(),
            opening,
            stats: PlayerStats::from_moves(&self.analyses),
            created_at: self.created_at,
        }
    }

    fn from_standard_start(&self) -> bool {
        self.start.fen() == chess_core::STARTING_FEN
    }

    fn push(&mut self, mv: &Move) -> Result<MoveRecord, SessionError> {
        let fen_before = self.board.fen();
        let played = self.board.play(mv)?;
        let record = MoveRecord {
            san: played.san.clone(),
            uci: played.uci,
            fen_before,
        };
        self.board = played.board;
        self.san_log.push(played.san);
        self.history.push(record.clone());
        Ok(record)
    }
}
