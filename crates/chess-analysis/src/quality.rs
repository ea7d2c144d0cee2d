//! Move quality classification and coaching feedback.

use chess_openings::Opening;
use serde::Serialize;

/// Classification of move quality based on centipawn loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveQuality {
    /// Follows a known opening line
    Book,
    /// The best move in the position
    Best,
    /// Excellent move (minimal centipawn loss)
    Excellent,
    /// Good move (small centipawn loss)
    Good,
    /// Inaccuracy (noticeable centipawn loss)
    Inaccuracy,
    /// Mistake (significant centipawn loss)
    Mistake,
    /// Blunder (major centipawn loss)
    Blunder,
}

impl MoveQuality {
    /// Classifies a move by its centipawn loss.
    ///
    /// A book move is labelled [`MoveQuality::Book`] whatever the loss.
    ///
    /// | CPL | Quality |
    /// |-----|---------|
    /// | 0 | Best |
    /// | 1-20 | Excellent |
    /// | 21-50 | Good |
    /// | 51-100 | Inaccuracy |
    /// | 101-300 | Mistake |
    /// | 301+ | Blunder |
    #[must_use]
    pub fn from_cp_loss(cp_loss: u32, is_book: bool) -> Self {
        if is_book {
            return Self::Book;
        }
        match cp_loss {
            0 => Self::Best,
            1..=20 => Self::Excellent,
            21..=50 => Self::Good,
            51..=100 => Self::Inaccuracy,
            101..=300 => Self::Mistake,
            _ => Self::Blunder,
        }
    }

    /// Lowercase label used in JSON and stats.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Best => "best",
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Inaccuracy => "inaccuracy",
            Self::Mistake => "mistake",
            Self::Blunder => "blunder",
        }
    }

    /// Short phrase shown to the player.
    #[must_use]
    pub fn headline(self) -> &'static str {
        match self {
            Self::Book => "Book Move!",
            Self::Best => "Best Move!",
            Self::Excellent => "Excellent!",
            Self::Good => "Good Move!",
            Self::Inaccuracy => "Inaccuracy",
            Self::Mistake => "Mistake",
            Self::Blunder => "Blunder!",
        }
    }

    /// Whether the feedback should point at the engine's move.
    #[must_use]
    pub fn shows_best_move(self) -> bool {
        matches!(self, Self::Inaccuracy | Self::Mistake | Self::Blunder)
    }
}

/// Renders the coaching line for one user move.
#[must_use]
pub fn feedback_message(quality: MoveQuality, user_san: &str, cp_loss: u32, best_san: &str) -> String {
    let mut message = format!(
        "Your move {user_san}: {} (CPL: {cp_loss})",
        quality.headline()
    );
    if quality.shows_best_move() {
        message.push_str(" - Best: ");
        message.push_str(best_san);
    }
    message
}

/// Analysis result for a single user move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveAnalysis {
    /// The move that was played, in SAN.
    pub san: String,
    /// The move that was played, in UCI notation.
    pub uci: String,
    /// The engine's recommended move in SAN, if the position had one.
    pub best_move_san: Option<String>,
    /// Material balance after the move minus before (White's view).
    pub material_change: i32,
    /// Engine score after the move minus before (White's view).
    pub positional_change: i32,
    /// Score before the move (White's view, mates folded).
    pub score_before: i32,
    /// Score after the move (White's view, mates folded).
    pub score_after: i32,
    /// Gap between the played move and the engine's move.
    pub cp_loss: u32,
    pub is_book_move: bool,
    pub opening: Option<Opening>,
    pub quality: MoveQuality,
}

impl MoveAnalysis {
    /// The coaching line for this move.
    #[must_use]
    pub fn feedback(&self) -> String {
        feedback_message(
            self.quality,
            &self.san,
            self.cp_loss,
            self.best_move_san.as_deref().unwrap_or("-"),
        )
    }
}

/// Statistics for a player's performance in a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerStats {
    /// Total moves analyzed
    pub total_moves: u32,
    /// Number of book moves
    pub book_moves: u32,
    /// Number of best moves
    pub best_moves: u32,
    /// Number of excellent moves
    pub excellent_moves: u32,
    /// Number of good moves
    pub good_moves: u32,
    /// Number of inaccuracies
    pub inaccuracies: u32,
    /// Number of mistakes
    pub mistakes: u32,
    /// Number of blunders
    pub blunders: u32,
    /// Average centipawn loss
    pub avg_cp_loss: f64,
}

impl PlayerStats {
    /// Tallies a sequence of analysed moves.
    pub fn from_moves<'a>(moves: impl IntoIterator<Item = &'a MoveAnalysis>) -> Self {
        let mut stats = Self::default();
        let mut total_cp_loss: u64 = 0;
        for analysis in moves {
            stats.record(analysis.quality);
            total_cp_loss += u64::from(analysis.cp_loss);
        }
        if stats.total_moves > 0 {
            stats.avg_cp_loss = total_cp_loss as f64 / f64::from(stats.total_moves);
        }
        stats
    }

    fn record(&mut self, quality: MoveQuality) {
        self.total_moves += 1;
        let counter = match quality {
            MoveQuality::Book => &mut self.book_moves,
            MoveQuality::Best => &mut self.best_moves,
            MoveQuality::Excellent => &mut self.excellent_moves,
            MoveQuality::Good => &mut self.good_moves,
            MoveQuality::Inaccuracy => &mut self.inaccuracies,
            MoveQuality::Mistake => &mut self.mistakes,
            MoveQuality::Blunder => &mut self.blunders,
        };
        *counter += 1;
    }
}
