//! Error types for sessions and the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_analysis::AnalyzerError;
use chess_core::RulesError;
use serde_json::json;
use thiserror::Error;

/// Why a session operation was rejected. The session is unchanged in every
/// case.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The move is well-formed but not legal in the current position.
    #[error("Illegal move: {0}")]
    IllegalMove(String),
    /// The move or position could not be parsed.
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    /// The engine could not score the move or produce a reply.
    #[error("Engine unavailable: {0}")]
    OracleUnavailable(String),
}

impl From<RulesError> for SessionError {
    fn from(err: RulesError) -> Self {
        match err {
            RulesError::IllegalMove { .. } => Self::IllegalMove(err.to_string()),
            RulesError::MalformedFen { .. } | RulesError::MalformedMove(_) => {
                Self::MalformedInput(err.to_string())
            }
        }
    }
}

impl From<AnalyzerError> for SessionError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::Rules(rules) => rules.into(),
            other => Self::OracleUnavailable(other.to_string()),
        }
    }
}

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Session(SessionError::IllegalMove(_) | SessionError::MalformedInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Session(SessionError::OracleUnavailable(msg)) => {
                tracing::warn!("Engine unavailable: {msg}");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_analysis::EngineError;
    use std::time::Duration;

    #[test]
    fn test_rules_errors_map_to_session_errors() {
        let illegal = RulesError::IllegalMove {
            uci: "e2e5".into(),
            fen: chess_core::STARTING_FEN.into(),
        };
        assert!(matches!(
            SessionError::from(illegal),
            SessionError::IllegalMove(_)
        ));
        assert!(matches!(
            SessionError::from(RulesError::MalformedMove("zz".into())),
            SessionError::MalformedInput(_)
        ));
    }

    #[test]
    fn test_engine_errors_map_to_oracle_unavailable() {
        let err = AnalyzerError::Engine(EngineError::Timeout(Duration::from_secs(1)));
        assert!(matches!(
            SessionError::from(err),
            SessionError::OracleUnavailable(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                SessionError::IllegalMove("x".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                SessionError::MalformedInput("x".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                SessionError::OracleUnavailable("x".into()).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
