//! Move specifications as submitted by a client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shakmaty::uci::UciMove;
use shakmaty::Square;

use crate::RulesError;

/// A move as a (from, to, promotion) triple, before it has been checked
/// against a position.
///
/// Squares use algebraic coordinates ("e2"); the promotion is one of
/// `q`, `r`, `b`, `n` in either case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSpec {
    /// Origin square.
    pub from: String,
    /// Destination square.
    pub to: String,
    /// Promotion piece letter, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

impl MoveSpec {
    /// Creates a non-promoting move specification.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            promotion: None,
        }
    }

    /// Sets the promotion piece.
    #[must_use]
    pub fn with_promotion(mut self, piece: impl Into<String>) -> Self {
        self.promotion = Some(piece.into());
        self
    }

    /// Validates the squares and promotion letter and converts the triple
    /// into a UCI move.
    pub fn to_uci(&self) -> Result<UciMove, RulesError> {
        let from = parse_square(&self.from)?;
        let to = parse_square(&self.to)?;

        let promotion = match self.promotion.as_deref().map(str::trim) {
            None | Some("") => String::new(),
            Some(p) => {
                let lower = p.to_ascii_lowercase();
                if !matches!(lower.as_str(), "q" | "r" | "b" | "n") {
                    return Err(RulesError::MalformedMove(format!(
                        "invalid promotion piece '{p}'"
                    )));
                }
                lower
            }
        };

        format!("{from}{to}{promotion}")
            .parse::<UciMove>()
            .map_err(|e| RulesError::MalformedMove(e.to_string()))
    }
}

fn parse_square(s: &str) -> Result<Square, RulesError> {
    s.trim()
        .to_ascii_lowercase()
        .parse::<Square>()
        .map_err(|_| RulesError::MalformedMove(format!("invalid square '{s}'")))
}

impl FromStr for MoveSpec {
    type Err = RulesError;

    /// Parses a UCI string such as `e2e4` or `e7e8q`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(RulesError::MalformedMove(format!("invalid UCI move '{s}'")));
        }
        let spec = Self {
            from: s[0..2].to_string(),
            to: s[2..4].to_string(),
            promotion: (s.len() == 5).then(|| s[4..].to_string()),
        };
        spec.to_uci()?;
        Ok(spec)
    }
}

impl fmt::Display for MoveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = &self.promotion {
            write!(f, "{}", p.to_ascii_lowercase())?;
        }
        Ok(())
    }
}
