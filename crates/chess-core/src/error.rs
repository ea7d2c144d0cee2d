//! Rules engine errors.

use thiserror::Error;

/// Errors produced while decoding or applying moves and positions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// The position string could not be parsed or is not a legal setup.
    #[error("invalid FEN '{fen}': {reason}")]
    MalformedFen {
        /// The rejected FEN string.
        fen: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The move specification could not be parsed.
    #[error("malformed move: {0}")]
    MalformedMove(String),

    /// The move is well-formed but not legal in the given position.
    #[error("illegal move {uci} in position {fen}")]
    IllegalMove {
        /// The move in UCI notation.
        uci: String,
        /// The position the move was tried in.
        fen: String,
    },
}
