//! Move analysis for the chess coach.
//!
//! This crate turns engine scores into coaching feedback.
//!
//! # Overview
//!
//! - [`material_balance`] - Static material count (White minus Black)
//! - [`Evaluation`] - Position evaluation (centipawn or mate score)
//! - [`MoveQuality`] - Classification of move quality (Book, Best, Excellent, etc.)
//! - [`Oracle`] / [`UciOracle`] - The engine that scores positions
//! - [`MoveAnalyzer`] - Scores a single user move against the engine's choice
//!
//! # Example
//!
//! ```ignore
//! use std::{sync::Arc, time::Duration};
//! use chess_analysis::{AnalysisConfig, MoveAnalyzer, UciOracle};
//!
//! let oracle = Arc::new(UciOracle::new("stockfish", 2, Duration::from_secs(10)));
//! let analyzer = MoveAnalyzer::new(oracle, AnalysisConfig::default());
//! let analysis = analyzer.analyze(&board, &mv, &log, &mut book).await?;
//! println!("{}", analysis.feedback());
//! ```

pub mod analyzer;
pub mod engine;
pub mod evaluation;
pub mod material;
pub mod quality;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use analyzer::{AnalysisConfig, AnalyzerError, MoveAnalyzer, PositionEvaluation};
pub use engine::{EngineError, Oracle, PositionAnalysis, UciOracle};
pub use evaluation::{Evaluation, MATE_SCORE};
pub use material::material_balance;
pub use quality::{feedback_message, MoveAnalysis, MoveQuality, PlayerStats};
