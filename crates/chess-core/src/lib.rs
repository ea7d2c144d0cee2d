//! Chess rules for the coach.
//!
//! This crate wraps the `shakmaty` rules engine behind the small surface the
//! rest of the workspace needs:
//! - [`Board`] for immutable positions exchanged as FEN
//! - [`MoveSpec`] for client-submitted (from, to, promotion) moves
//! - [`GameOutcome`] for finished games
//! - [`RulesError`] for malformed or illegal input

mod board;
mod error;
mod mov;

pub use board::{Board, GameOutcome, Played, STARTING_FEN};
pub use error::RulesError;
pub use mov::MoveSpec;
pub use shakmaty::{Color, Move, Role};
