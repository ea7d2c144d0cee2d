//! Opening corpus API.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chess_openings::Opening;
use serde::Deserialize;

use crate::AppState;

/// Query parameters for listing openings.
#[derive(Debug, Default, Deserialize)]
pub struct OpeningsQuery {
    /// Case-insensitive name substring.
    pub q: Option<String>,
    /// ECO code prefix, e.g. "C6".
    pub eco: Option<String>,
}

/// List the opening corpus, optionally filtered.
///
/// # Endpoint
///
/// `GET /api/openings`
///
/// # Query Parameters
///
/// - `q`: name search (optional)
/// - `eco`: ECO prefix (optional)
///
/// # Caching
///
/// Response is cached for an hour (the corpus is fixed at startup).
pub async fn list_openings(
    State(state): State<AppState>,
    Query(query): Query<OpeningsQuery>,
) -> impl IntoResponse {
    let mut openings: Vec<&Opening> = match query.q.as_deref() {
        Some(q) => state.openings.search(q),
        None => state.openings.all().iter().collect(),
    };
    if let Some(eco) = query.eco.as_deref() {
        openings.retain(|o| o.eco.starts_with(eco));
    }
    let openings: Vec<Opening> = openings.into_iter().cloned().collect();

    (
        [(header::CACHE_CONTROL, "public, max-age=3600")],
        Json(openings),
    )
}

/// Body of `POST /api/openings/identify`.
#[derive(Debug, Deserialize)]
pub struct IdentifyRequest {
    /// SAN moves from the starting position.
    pub moves: Vec<String>,
}

/// Name the opening of a game: the longest corpus line it has played.
///
/// `POST /api/openings/identify`
pub async fn identify(
    State(state): State<AppState>,
    Json(request): Json<IdentifyRequest>,
) -> Json<Option<Opening>> {
    Json(state.openings.identify(&request.moves).cloned())
}
