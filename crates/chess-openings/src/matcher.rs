//! Live opening detection for a single game.
//!
//! [`BookMatcher`] follows the user's side of a game and reports whether each
//! of their first moves keeps the game inside some corpus line. Candidates
//! only ever shrink: the first deviation switches the matcher off until
//! [`BookMatcher::reset`] starts a new game.

use std::sync::Arc;

use serde::Serialize;

use crate::database::OpeningDatabase;
use crate::opening::Opening;

/// Number of user moves that are checked against the book.
pub const MAX_BOOK_USER_MOVES: u32 = 5;

/// Result of checking one user move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookCheck {
    pub is_book: bool,
    pub opening: Option<Opening>,
}

impl BookCheck {
    fn out_of_book() -> Self {
        Self {
            is_book: false,
            opening: None,
        }
    }
}

/// Snapshot of the matcher state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookStatus {
    pub active: bool,
    pub user_move_count: u32,
    /// Names of the lines still consistent with the game, in corpus order.
    pub candidates: Vec<String>,
}

/// Per-game opening-match state.
#[derive(Debug, Clone)]
pub struct BookMatcher {
    corpus: Arc<OpeningDatabase>,
    active: bool,
    /// Corpus indices, always ascending.
    candidates: Vec<usize>,
    user_move_count: u32,
}

impl BookMatcher {
    /// Creates an active matcher over `corpus`.
    #[must_use]
    pub fn new(corpus: Arc<OpeningDatabase>) -> Self {
        Self {
            corpus,
            active: true,
            candidates: Vec::new(),
            user_move_count: 0,
        }
    }

    /// Checks a user move played after `log`, the SAN of every move so far
    /// (both sides).
    ///
    /// The first checked move selects the lines that open with `san`; later
    /// moves keep the lines that contain the whole game so far.
    pub fn check_user_move(&mut self, log: &[String], san: &str) -> BookCheck {
        if !self.active {
            return BookCheck::out_of_book();
        }

        self.user_move_count += 1;
        if self.user_move_count > MAX_BOOK_USER_MOVES {
            self.active = false;
            self.candidates.clear();
            return BookCheck::out_of_book();
        }

        if self.user_move_count == 1 {
            self.candidates = self.corpus.indices_opening_with(san);
        } else {
            let mut proposed = log.to_vec();
            proposed.push(san.to_string());
            let corpus = &self.corpus;
            self.candidates.retain(|&i| {
                corpus
                    .get(i)
                    .is_some_and(|opening| opening.starts_with(&proposed))
            });
        }

        match self.candidates.first().and_then(|&i| self.corpus.get(i)) {
            Some(opening) => BookCheck {
                is_book: true,
                opening: Some(opening.clone()),
            },
            None => {
                self.active = false;
                self.candidates.clear();
                BookCheck::out_of_book()
            }
        }
    }

    /// Switches the matcher off for the rest of the game.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.candidates.clear();
    }

    /// Starts over for a new game.
    pub fn reset(&mut self) {
        self.active = true;
        self.candidates.clear();
        self.user_move_count = 0;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn user_move_count(&self) -> u32 {
        self.user_move_count
    }

    /// The lines still consistent with the game, in corpus order.
    pub fn candidates(&self) -> impl Iterator<Item = &Opening> + '_ {
        self.candidates.iter().filter_map(|&i| self.corpus.get(i))
    }

    #[must_use]
    pub fn status(&self) -> BookStatus {
        BookStatus {
            active: self.active,
            user_move_count: self.user_move_count,
            candidates: self.candidates().map(|o| o.name.clone()).collect(),
        }
    }
}
