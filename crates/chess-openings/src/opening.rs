//! Core opening types and structures.

use serde::{Deserialize, Serialize};

/// A named opening line.
///
/// Moves are in standard algebraic notation exactly as the rules engine
/// renders them, including check (`+`) and mate (`#`) suffixes, alternating
/// White and Black from the initial position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    /// The ECO code for this opening (e.g., "B20", "C60").
    pub eco: String,
    /// The name of the opening.
    pub name: String,
    /// The canonical line in SAN.
    pub moves: Vec<String>,
    /// Short human-readable description.
    #[serde(default)]
    pub description: String,
}

impl Opening {
    /// Creates a new opening with the given ECO code, name, and moves.
    #[must_use]
    pub fn new(eco: impl Into<String>, name: impl Into<String>, moves: Vec<String>) -> Self {
        Self {
            eco: eco.into(),
            name: name.into(),
            moves,
            description: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns true if this line begins with every move of `prefix`.
    ///
    /// A line shorter than the prefix never matches.
    #[must_use]
    pub fn starts_with(&self, prefix: &[String]) -> bool {
        self.moves.len() >= prefix.len() && self.moves[..prefix.len()] == *prefix
    }

    /// Returns true if the whole line has been played at the start of `game`.
    #[must_use]
    pub fn is_prefix_of(&self, game: &[String]) -> bool {
        game.len() >= self.moves.len() && game[..self.moves.len()] == *self.moves
    }

    /// The line as numbered movetext, e.g. `1. e4 c5 2. Nf3`.
    #[must_use]
    pub fn movetext(&self) -> String {
        self.moves
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| format!("{}. {}", i + 1, pair.join(" ")))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
