//! Game archive API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::api::sessions::Archived;
use crate::error::ApiError;
use crate::store::{StoredGame, StoredGameSummary};
use crate::AppState;

/// List archived games, oldest first.
///
/// `GET /api/games`
pub async fn list_games(State(state): State<AppState>) -> Json<Vec<StoredGameSummary>> {
    Json(state.games.list())
}

/// Archive an arbitrary JSON payload.
///
/// # Endpoint
///
/// `POST /api/games`
///
/// # Response
///
/// - `201 Created`: id of the stored game
pub async fn create_game(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Archived>) {
    let id = state.games.store(payload);
    (StatusCode::CREATED, Json(Archived { id }))
}

/// Fetch an archived game.
///
/// # Endpoint
///
/// `GET /api/games/:id`
///
/// # Response
///
/// - `200 OK`: the stored game
/// - `404 Not Found`: never stored, or evicted
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredGame>, ApiError> {
    state
        .games
        .get(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Game not found: {id}")))
}
