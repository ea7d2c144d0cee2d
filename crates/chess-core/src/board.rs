//! Immutable board positions backed by `shakmaty`.

use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, KnownOutcome, Move, Position, Role};

use crate::{MoveSpec, RulesError};

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Final outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    /// White delivered mate.
    WhiteWins,
    /// Black delivered mate.
    BlackWins,
    /// Stalemate, insufficient material, or another drawn ending.
    Draw,
}

impl GameOutcome {
    /// PGN result token for this outcome.
    #[must_use]
    pub const fn as_result(self) -> &'static str {
        match self {
            GameOutcome::WhiteWins => "1-0",
            GameOutcome::BlackWins => "0-1",
            GameOutcome::Draw => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_result())
    }
}

/// The result of playing a legal move on a [`Board`].
#[derive(Debug, Clone)]
pub struct Played {
    /// Position after the move.
    pub board: Board,
    /// Standard algebraic notation, including `+`/`#` suffixes.
    pub san: String,
    /// UCI notation.
    pub uci: String,
}

/// A chess position.
///
/// Boards are values: applying a move yields a new board and leaves the
/// original untouched.
#[derive(Debug, Clone)]
pub struct Board {
    pos: Chess,
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl Board {
    /// The standard starting position.
    #[must_use]
    pub fn starting() -> Self {
        Self {
            pos: Chess::default(),
        }
    }

    /// Parses a position from FEN.
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let malformed = |reason: String| RulesError::MalformedFen {
            fen: fen.to_string(),
            reason,
        };
        let parsed: Fen = fen.trim().parse().map_err(|e| malformed(format!("{e}")))?;
        let pos: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| malformed(format!("{e}")))?;
        Ok(Self { pos })
    }

    /// Serializes the position as FEN.
    #[must_use]
    pub fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    /// The side to move.
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.pos.turn()
    }

    /// The fullmove number (starts at 1, incremented after Black moves).
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.pos.fullmoves().get()
    }

    /// Number of pieces of the given colour and role on the board.
    #[must_use]
    pub fn count(&self, color: Color, role: Role) -> u32 {
        let board = self.pos.board();
        (board.by_color(color) & board.by_role(role)).count() as u32
    }

    /// Resolves a client move specification against this position.
    pub fn decode(&self, spec: &MoveSpec) -> Result<Move, RulesError> {
        let uci = spec.to_uci()?;
        self.resolve(&uci)
    }

    /// Resolves a UCI string (as produced by an engine) against this position.
    pub fn decode_uci(&self, uci: &str) -> Result<Move, RulesError> {
        let parsed: UciMove = uci
            .trim()
            .parse()
            .map_err(|_| RulesError::MalformedMove(format!("invalid UCI move '{uci}'")))?;
        self.resolve(&parsed)
    }

    fn resolve(&self, uci: &UciMove) -> Result<Move, RulesError> {
        uci.to_move(&self.pos).map_err(|_| RulesError::IllegalMove {
            uci: uci.to_string(),
            fen: self.fen(),
        })
    }

    /// Plays a legal move, returning the new position together with the
    /// move's notation.
    pub fn play(&self, mv: &Move) -> Result<Played, RulesError> {
        let san = San::from_move(&self.pos, mv.clone()).to_string();
        let uci = mv.to_uci(CastlingMode::Standard).to_string();
        let after = self
            .pos
            .clone()
            .play(mv.clone())
            .map_err(|_| RulesError::IllegalMove {
                uci: uci.clone(),
                fen: self.fen(),
            })?;

        let suffix = if after.is_checkmate() {
            "#"
        } else if after.is_check() {
            "+"
        } else {
            ""
        };

        Ok(Played {
            board: Board { pos: after },
            san: format!("{san}{suffix}"),
            uci,
        })
    }

    /// Decodes and plays a UCI move in one step.
    pub fn play_uci(&self, uci: &str) -> Result<Played, RulesError> {
        let mv = self.decode_uci(uci)?;
        self.play(&mv)
    }

    /// All legal moves in UCI notation.
    #[must_use]
    pub fn legal_moves_uci(&self) -> Vec<String> {
        self.pos
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .collect()
    }

    /// True when the side to move is checkmated.
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.pos.is_checkmate()
    }

    /// True when the game has ended by mate, stalemate, or insufficient
    /// material.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.pos.is_game_over()
    }

    /// The outcome, if the game is over.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.pos.outcome().known().map(|outcome| match outcome {
            KnownOutcome::Decisive {
                winner: Color::White,
            } => GameOutcome::WhiteWins,
            KnownOutcome::Decisive {
                winner: Color::Black,
            } => GameOutcome::BlackWins,
            KnownOutcome::Draw => GameOutcome::Draw,
        })
    }

    /// PGN result token: the outcome, or `*` for a game in progress.
    #[must_use]
    pub fn result(&self) -> &'static str {
        self.outcome().map_or("*", GameOutcome::as_result)
    }
}
