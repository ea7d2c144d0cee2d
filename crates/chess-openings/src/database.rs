//! Opening database storage and lookup.

use std::path::Path;

use thiserror::Error;

use crate::opening::Opening;

/// Errors that can occur when loading opening databases.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An opening in the source data is unusable.
    #[error("failed to parse opening database: {0}")]
    ParseError(String),

    /// Failed to read the opening database file.
    #[error("failed to read opening database: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// An ordered, read-only collection of named openings.
///
/// Order is significant: lookups that can match several openings report
/// them in the order they were loaded.
#[derive(Debug, Clone, Default)]
pub struct OpeningDatabase {
    /// All openings, in corpus order.
    openings: Vec<Opening>,
}

impl OpeningDatabase {
    /// Creates a new empty opening database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new opening database with the given openings.
    #[must_use]
    pub fn with_openings(openings: Vec<Opening>) -> Self {
        Self { openings }
    }

    /// Parses a JSON array of openings.
    ///
    /// Every opening must have a name and at least one move.
    pub fn from_json_str(json: &str) -> Result<Self, DatabaseError> {
        let openings: Vec<Opening> = serde_json::from_str(json)?;
        for (i, opening) in openings.iter().enumerate() {
            if opening.name.trim().is_empty() {
                return Err(DatabaseError::ParseError(format!(
                    "opening #{i} has no name"
                )));
            }
            if opening.moves.is_empty() {
                return Err(DatabaseError::ParseError(format!(
                    "opening '{}' has no moves",
                    opening.name
                )));
            }
        }
        Ok(Self { openings })
    }

    /// Loads a JSON array of openings from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Returns the number of openings in the database.
    #[must_use]
    pub fn len(&self) -> usize {
        self.openings.len()
    }

    /// Returns true if the database contains no openings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.openings.is_empty()
    }

    /// Returns all openings in corpus order.
    #[must_use]
    pub fn all(&self) -> &[Opening] {
        &self.openings
    }

    /// Returns the opening at a corpus index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Opening> {
        self.openings.get(index)
    }

    /// Corpus indices of every opening whose first move is `san`.
    #[must_use]
    pub fn indices_opening_with(&self, san: &str) -> Vec<usize> {
        self.openings
            .iter()
            .enumerate()
            .filter(|(_, o)| o.moves.first().is_some_and(|m| m == san))
            .map(|(i, _)| i)
            .collect()
    }

    /// Finds all openings matching an ECO code prefix.
    ///
    /// For example, `by_eco("C6")` would match "C60" and "C65".
    #[must_use]
    pub fn by_eco(&self, eco_prefix: &str) -> Vec<&Opening> {
        self.openings
            .iter()
            .filter(|o| o.eco.starts_with(eco_prefix))
            .collect()
    }

    /// Searches for openings by name (case-insensitive substring match).
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Opening> {
        let query_lower = query.to_lowercase();
        self.openings
            .iter()
            .filter(|o| o.name.to_lowercase().contains(&query_lower))
            .collect()
    }

    /// Names the opening of a game: the longest corpus line played in full
    /// at the start of `moves`. Ties go to the earlier entry.
    #[must_use]
    pub fn identify(&self, moves: &[String]) -> Option<&Opening> {
        self.openings
            .iter()
            .filter(|o| o.is_prefix_of(moves))
            .fold(None, |best: Option<&Opening>, o| match best {
                Some(b) if b.moves.len() >= o.moves.len() => Some(b),
                _ => Some(o),
            })
    }
}
