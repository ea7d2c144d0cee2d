//! API handlers for the coach server.

pub mod games;
pub mod openings;
pub mod sessions;
