//! Chess position evaluation types.

use chess_core::Color;
use serde::Serialize;

/// Centipawn value a forced mate is folded to before any arithmetic.
pub const MATE_SCORE: i32 = 10_000;

/// Represents a chess position evaluation.
///
/// Evaluations can be either centipawn scores (for normal positions)
/// or mate scores (when a forced mate is found). Scores reported by a UCI
/// engine are from the side to move's point of view; use
/// [`Evaluation::for_white`] to normalize them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Evaluation {
    /// Centipawn evaluation (positive = advantage for the viewing side)
    Centipawn(i32),
    /// Mate in N moves (positive = viewing side mates, negative = gets mated).
    /// `Mate(0)` means the viewing side is already mated.
    Mate(i32),
}

impl Evaluation {
    /// Builds an evaluation from the `score cp` / `score mate` fields of a
    /// UCI info line. Mate wins when both are present.
    #[must_use]
    pub fn from_uci_score(cp: Option<i32>, mate: Option<i32>) -> Option<Self> {
        match (cp, mate) {
            (_, Some(m)) => Some(Self::Mate(m)),
            (Some(c), None) => Some(Self::Centipawn(c)),
            (None, None) => None,
        }
    }

    /// The same evaluation seen from the other side.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Centipawn(cp) => Self::Centipawn(-cp),
            // The other side is already mated: a finished win.
            Self::Mate(0) => Self::Centipawn(MATE_SCORE),
            Self::Mate(n) => Self::Mate(-n),
        }
    }

    /// Converts a side-to-move evaluation into White's point of view.
    #[must_use]
    pub fn for_white(self, side_to_move: Color) -> Self {
        match side_to_move {
            Color::White => self,
            Color::Black => self.flip(),
        }
    }

    /// Centipawn value with mates folded to `±MATE_SCORE`.
    #[must_use]
    pub fn to_centipawns(self) -> i32 {
        match self {
            Self::Centipawn(cp) => cp,
            Self::Mate(n) if n > 0 => MATE_SCORE,
            Self::Mate(_) => -MATE_SCORE,
        }
    }

    #[must_use]
    pub fn is_mate(self) -> bool {
        matches!(self, Self::Mate(_))
    }
}
