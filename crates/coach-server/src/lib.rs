//! Chess coach server library.
//!
//! Per-game sessions that analyse each user move against an engine oracle,
//! report opening-book status, and answer with an engine move, plus a small
//! bounded archive of finished games. [`app`] builds the HTTP router.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod registry;
pub mod session;
pub mod store;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use chess_analysis::{AnalysisConfig, MoveAnalyzer, Oracle};
use chess_openings::OpeningDatabase;
use tower_http::cors::{Any, CorsLayer};

use crate::registry::SessionRegistry;
use crate::store::GameStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Live game sessions.
    pub sessions: Arc<SessionRegistry>,
    /// Archive of finished games.
    pub games: Arc<GameStore>,
    /// The opening corpus.
    pub openings: Arc<OpeningDatabase>,
    /// Move analysis over the engine oracle.
    pub analyzer: MoveAnalyzer,
}

impl AppState {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        openings: Arc<OpeningDatabase>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new(Arc::clone(&openings))),
            games: Arc::new(GameStore::new()),
            openings,
            analyzer: MoveAnalyzer::new(oracle, config),
        }
    }

    /// Replaces the session registry with one capped at `max_sessions`.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.sessions = Arc::new(SessionRegistry::with_max_sessions(
            Arc::clone(&self.openings),
            max_sessions,
        ));
        self
    }
}

/// Health check endpoint.
///
/// Returns "ok" to indicate the server is running.
async fn health() -> &'static str {
    "ok"
}

/// Builds the HTTP router.
pub fn app(state: AppState) -> Router {
    // CORS layer for cross-origin requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/openings", get(api::openings::list_openings))
        .route("/api/openings/identify", post(api::openings::identify))
        .route("/api/sessions", post(api::sessions::create_session))
        .route("/api/sessions/:id", delete(api::sessions::delete_session))
        .route(
            "/api/sessions/:id/state",
            get(api::sessions::get_state).put(api::sessions::set_state),
        )
        .route("/api/sessions/:id/history", get(api::sessions::get_history))
        .route("/api/sessions/:id/book", get(api::sessions::get_book))
        .route(
            "/api/sessions/:id/analyze",
            get(api::sessions::analyze_position),
        )
        .route("/api/sessions/:id/move", post(api::sessions::make_move))
        .route("/api/sessions/:id/reset", post(api::sessions::reset))
        .route("/api/sessions/:id/archive", post(api::sessions::archive))
        .route(
            "/api/games",
            get(api::games::list_games).post(api::games::create_game),
        )
        .route("/api/games/:id", get(api::games::get_game))
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::timing_layer))
        .layer(cors)
}
