//! Chess opening corpus and live book detection.
//!
//! This crate provides the ordered opening corpus used by the coach, lookups
//! over it, and [`BookMatcher`], which tracks whether a game in progress is
//! still following a known line.

pub mod builtin;
pub mod database;
pub mod matcher;
pub mod opening;

pub use builtin::builtin_database;
pub use database::{DatabaseError, OpeningDatabase};
pub use matcher::{BookCheck, BookMatcher, BookStatus, MAX_BOOK_USER_MOVES};
pub use opening::Opening;
