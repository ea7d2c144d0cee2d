//! Game session API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chess_analysis::PositionEvaluation;
use chess_core::MoveSpec;
use chess_openings::BookStatus;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::registry::SharedSession;
use crate::session::{MoveOutcome, MoveRecord, SessionState};
use crate::AppState;

fn session(state: &AppState, id: &str) -> Result<SharedSession, ApiError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {id}")))
}

/// Response for a newly created session.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedSession {
    pub session_id: String,
    pub fen: String,
}

/// Start a new game.
///
/// # Endpoint
///
/// `POST /api/sessions`
///
/// # Response
///
/// - `201 Created`: session id and starting FEN
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<CreatedSession>) {
    let session_id = state.sessions.create();
    (
        StatusCode::CREATED,
        Json(CreatedSession {
            session_id,
            fen: chess_core::STARTING_FEN.to_string(),
        }),
    )
}

/// Drop a session.
///
/// `DELETE /api/sessions/:id`
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Session not found: {id}")))
    }
}

/// Current position and status.
///
/// `GET /api/sessions/:id/state`
pub async fn get_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionState>, ApiError> {
    let session = session(&state, &id)?;
    let game = session.lock().await;
    Ok(Json(game.state()))
}

/// Body of `PUT /api/sessions/:id/state`.
#[derive(Debug, Deserialize)]
pub struct SetPositionRequest {
    /// Starting position; the standard start when absent.
    pub fen: Option<String>,
    /// UCI moves to replay from `fen`.
    #[serde(default)]
    pub moves: Vec<String>,
}

/// Replace the position and rebuild the history from a move stack.
///
/// # Endpoint
///
/// `PUT /api/sessions/:id/state`
///
/// # Response
///
/// - `200 OK`: the new session state
/// - `400 Bad Request`: unparseable FEN or an illegal move in the stack
/// - `404 Not Found`: unknown session
pub async fn set_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetPositionRequest>,
) -> Result<Json<SessionState>, ApiError> {
    let session = session(&state, &id)?;
    let mut game = session.lock().await;
    game.set_position(request.fen.as_deref(), &request.moves)?;
    tracing::info!(session_id = %id, moves = request.moves.len(), "position replaced");
    Ok(Json(game.state()))
}

/// Move history of a session.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub moves: Vec<MoveRecord>,
    pub total: usize,
}

/// `GET /api/sessions/:id/history`
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let session = session(&state, &id)?;
    let game = session.lock().await;
    let moves = game.history().to_vec();
    Ok(Json(HistoryResponse {
        total: moves.len(),
        moves,
    }))
}

/// Opening-match status.
///
/// `GET /api/sessions/:id/book`
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookStatus>, ApiError> {
    let session = session(&state, &id)?;
    let game = session.lock().await;
    Ok(Json(game.book().status()))
}

/// Evaluate the current position.
///
/// # Endpoint
///
/// `GET /api/sessions/:id/analyze`
///
/// # Response
///
/// - `200 OK`: White-perspective score and the engine's best move
/// - `503 Service Unavailable`: the engine failed
pub async fn analyze_position(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PositionEvaluation>, ApiError> {
    let board = {
        let session = session(&state, &id)?;
        let game = session.lock().await;
        game.board().clone()
    };
    let evaluation = state
        .analyzer
        .evaluate(&board)
        .await
        .map_err(crate::error::SessionError::from)?;
    Ok(Json(evaluation))
}

/// Play a user move and get feedback plus the engine's reply.
///
/// # Endpoint
///
/// `POST /api/sessions/:id/move`
///
/// # Request Body
///
/// `{"from": "e2", "to": "e4", "promotion": "q"}` (promotion optional)
///
/// # Response
///
/// - `200 OK`: analysis, feedback, reply move, resulting position
/// - `400 Bad Request`: illegal or malformed move
/// - `404 Not Found`: unknown session
/// - `503 Service Unavailable`: the engine failed; the move was not played
pub async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(spec): Json<MoveSpec>,
) -> Result<Json<MoveOutcome>, ApiError> {
    let session = session(&state, &id)?;
    let mut game = session.lock().await;
    let outcome = game.apply_user_move(&spec, &state.analyzer).await?;
    Ok(Json(outcome))
}

/// Start the game over.
///
/// `POST /api/sessions/:id/reset`
pub async fn reset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionState>, ApiError> {
    let session = session(&state, &id)?;
    let mut game = session.lock().await;
    game.reset();
    tracing::info!(session_id = %id, "session reset");
    Ok(Json(game.state()))
}

/// Response for an archived game.
#[derive(Debug, Serialize, Deserialize)]
pub struct Archived {
    pub id: String,
}

/// Archive the session's game in the game store.
///
/// # Endpoint
///
/// `POST /api/sessions/:id/archive`
///
/// # Response
///
/// - `201 Created`: id of the stored game
/// - `404 Not Found`: unknown session
pub async fn archive(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Archived>), ApiError> {
    let summary = {
        let session = session(&state, &id)?;
        let game = session.lock().await;
        game.summary()
    };
    let payload = serde_json::to_value(summary)
        .map_err(|e| ApiError::Internal(format!("Failed to encode game: {e}")))?;
    let game_id = state.games.store(payload);
    tracing::info!(session_id = %id, game_id = %game_id, "game archived");
    Ok((StatusCode::CREATED, Json(Archived { id: game_id })))
}
