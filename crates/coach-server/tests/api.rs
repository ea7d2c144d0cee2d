//! HTTP-level tests for the coach server.
//!
//! The router is driven with `tower::ServiceExt::oneshot` against a scripted
//! in-memory oracle, so no engine binary is needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chess_analysis::testing::ScriptedOracle;
use chess_analysis::{AnalysisConfig, Evaluation};
use chess_core::Board;
use chess_openings::builtin_database;
use coach_server::{app, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn setup() -> (Router, Arc<ScriptedOracle>) {
    let oracle = Arc::new(ScriptedOracle::default());
    let state = AppState::new(
        oracle.clone(),
        Arc::new(builtin_database()),
        AnalysisConfig::default(),
    );
    (app(state), oracle)
}

fn after(moves: &[&str]) -> Board {
    let mut board = Board::starting();
    for uci in moves {
        board = board.play_uci(uci).unwrap().board;
    }
    board
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn new_session(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

async fn play(app: &Router, id: &str, from: &str, to: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/api/sessions/{id}/move"),
        Some(json!({ "from": from, "to": to })),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let (app, _) = setup();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_new_session_starts_from_initial_position() {
    let (app, _) = setup();
    let id = new_session(&app).await;

    let (status, state) = send(&app, "GET", &format!("/api/sessions/{id}/state"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["fen"], chess_core::STARTING_FEN);
    assert_eq!(state["side_to_move"], "white");
    assert_eq!(state["move_count"], 0);
    assert_eq!(state["game_over"], false);
    assert_eq!(state["book"]["active"], true);
}

#[tokio::test]
async fn test_coaching_flow_through_and_out_of_book() {
    let (app, oracle) = setup();
    oracle.set(&Board::starting(), Evaluation::Centipawn(20), Some("e2e4"));
    oracle.set(&after(&["e2e4"]), Evaluation::Centipawn(-20), Some("c7c5"));
    oracle.set(&after(&["e2e4", "c7c5"]), Evaluation::Centipawn(25), Some("g1f3"));
    oracle.set(&after(&["e2e4", "c7c5", "g1f3"]), Evaluation::Centipawn(-25), Some("d7d6"));
    let id = new_session(&app).await;

    let (status, first) = play(&app, &id, "e2", "e4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["analysis"]["san"], "e4");
    assert_eq!(first["analysis"]["is_book_move"], true);
    assert_eq!(first["analysis"]["quality"], "book");
    assert_eq!(first["analysis"]["opening"]["name"], "King's Pawn Opening");
    assert_eq!(first["analysis"]["cp_loss"], 0);
    assert_eq!(first["feedback"], "Your move e4: Book Move! (CPL: 0)");
    assert_eq!(first["reply"]["san"], "c5");

    let (_, second) = play(&app, &id, "g1", "f3").await;
    assert_eq!(second["analysis"]["is_book_move"], true);
    assert_eq!(second["analysis"]["opening"]["name"], "Najdorf Variation");
    assert_eq!(second["reply"]["san"], "d6");

    let (_, third) = play(&app, &id, "h2", "h3").await;
    assert_eq!(third["analysis"]["is_book_move"], false);
    assert!(third["analysis"]["opening"].is_null());

    let (_, book) = send(&app, "GET", &format!("/api/sessions/{id}/book"), None).await;
    assert_eq!(book["active"], false);

    let (_, fourth) = play(&app, &id, "a2", "a3").await;
    assert_eq!(fourth["analysis"]["is_book_move"], false);

    let (_, history) = send(&app, "GET", &format!("/api/sessions/{id}/history"), None).await;
    assert_eq!(history["total"], 8);
    assert_eq!(history["moves"][0]["san"], "e4");
    assert_eq!(history["moves"][1]["san"], "c5");
    assert_eq!(history["moves"][0]["fen_before"], chess_core::STARTING_FEN);
}

#[tokio::test]
async fn test_mistake_feedback_names_best_move() {
    let (app, oracle) = setup();
    oracle.set(&Board::starting(), Evaluation::Centipawn(30), Some("d2d4"));
    // Black to move after 1.a4: +150 for Black is -150 for White.
    oracle.set(&after(&["a2a4"]), Evaluation::Centipawn(150), Some("e7e5"));
    oracle.set(&after(&["d2d4"]), Evaluation::Centipawn(-30), Some("d7d5"));
    let id = new_session(&app).await;

    let (status, body) = play(&app, &id, "a2", "a4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["score_before"], 30);
    assert_eq!(body["analysis"]["score_after"], -150);
    assert_eq!(body["analysis"]["cp_loss"], 180);
    assert_eq!(body["analysis"]["quality"], "mistake");
    assert_eq!(body["feedback"], "Your move a4: Mistake (CPL: 180) - Best: d4");
}

#[tokio::test]
async fn test_illegal_move_is_rejected() {
    let (app, _) = setup();
    let id = new_session(&app).await;

    let (status, body) = play(&app, &id, "e2", "e5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Illegal move"));

    let (_, state) = send(&app, "GET", &format!("/api/sessions/{id}/state"), None).await;
    assert_eq!(state["move_count"], 0);
    assert_eq!(state["book"]["user_move_count"], 0);
}

#[tokio::test]
async fn test_malformed_square_is_rejected() {
    let (app, _) = setup();
    let id = new_session(&app).await;

    let (status, _) = play(&app, &id, "z9", "e4").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_engine_failure_leaves_session_unchanged() {
    let (app, oracle) = setup();
    let id = new_session(&app).await;
    oracle.set_down(true);

    let (status, body) = play(&app, &id, "e2", "e4").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());

    let (_, state) = send(&app, "GET", &format!("/api/sessions/{id}/state"), None).await;
    assert_eq!(state["fen"], chess_core::STARTING_FEN);
    assert_eq!(state["move_count"], 0);
    assert_eq!(state["book"]["active"], true);
    assert_eq!(state["book"]["user_move_count"], 0);

    // The same move counts as the first book move once the engine is back.
    oracle.set_down(false);
    let (status, body) = play(&app, &id, "e2", "e4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["is_book_move"], true);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (app, _) = setup();

    let (status, _) = send(&app, "GET", "/api/sessions/missing/state", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = play(&app, "missing", "e2", "e4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/api/sessions/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_session() {
    let (app, _) = setup();
    let id = new_session(&app).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/api/sessions/{id}/state"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_position_replays_moves() {
    let (app, _) = setup();
    let id = new_session(&app).await;

    let (status, state) = send(
        &app,
        "PUT",
        &format!("/api/sessions/{id}/state"),
        Some(json!({ "moves": ["e2e4", "e7e5", "g1f3"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["move_count"], 3);
    assert_eq!(state["side_to_move"], "black");
    assert_eq!(state["fen"], after(&["e2e4", "e7e5", "g1f3"]).fen());
    assert_eq!(state["book"]["user_move_count"], 0);

    let (_, history) = send(&app, "GET", &format!("/api/sessions/{id}/history"), None).await;
    let sans: Vec<&str> = history["moves"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["san"].as_str().unwrap())
        .collect();
    assert_eq!(sans, ["e4", "e5", "Nf3"]);
}

#[tokio::test]
async fn test_set_position_rejects_bad_input_atomically() {
    let (app, _) = setup();
    let id = new_session(&app).await;
    send(
        &app,
        "PUT",
        &format!("/api/sessions/{id}/state"),
        Some(json!({ "moves": ["d2d4"] })),
    )
    .await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/sessions/{id}/state"),
        Some(json!({ "moves": ["e2e4", "e2e4"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/sessions/{id}/state"),
        Some(json!({ "fen": "not a fen" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, state) = send(&app, "GET", &format!("/api/sessions/{id}/state"), None).await;
    assert_eq!(state["fen"], after(&["d2d4"]).fen());
    assert_eq!(state["move_count"], 1);
}

#[tokio::test]
async fn test_set_position_from_fen_reports_game_over() {
    let (app, _) = setup();
    let id = new_session(&app).await;
    let mated = after(&["f2f3", "e7e5", "g2g4", "d8h4"]);

    let (status, state) = send(
        &app,
        "PUT",
        &format!("/api/sessions/{id}/state"),
        Some(json!({ "fen": mated.fen() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["game_over"], true);
    assert_eq!(state["result"], "0-1");
    assert_eq!(state["move_count"], 0);
}

#[tokio::test]
async fn test_reset_restores_start_and_book() {
    let (app, _) = setup();
    let id = new_session(&app).await;
    play(&app, &id, "a2", "a3").await;

    let (_, book) = send(&app, "GET", &format!("/api/sessions/{id}/book"), None).await;
    assert_eq!(book["active"], false);

    let (status, state) = send(&app, "POST", &format!("/api/sessions/{id}/reset"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["fen"], chess_core::STARTING_FEN);
    assert_eq!(state["move_count"], 0);
    assert_eq!(state["book"]["active"], true);
    assert_eq!(state["book"]["user_move_count"], 0);
}

#[tokio::test]
async fn test_analyze_position_reports_white_score() {
    let (app, oracle) = setup();
    let id = new_session(&app).await;
    send(
        &app,
        "PUT",
        &format!("/api/sessions/{id}/state"),
        Some(json!({ "moves": ["e2e4"] })),
    )
    .await;
    oracle.set(&after(&["e2e4"]), Evaluation::Centipawn(-40), Some("c7c5"));

    let (status, body) = send(&app, "GET", &format!("/api/sessions/{id}/analyze"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 40);
    assert_eq!(body["best_move_san"], "c5");
    assert_eq!(body["best_move_uci"], "c7c5");
}

#[tokio::test]
async fn test_archive_and_fetch_game() {
    let (app, _) = setup();
    let id = new_session(&app).await;
    send(
        &app,
        "PUT",
        &format!("/api/sessions/{id}/state"),
        Some(json!({ "moves": ["f2f3", "e7e5", "g2g4", "d8h4"] })),
    )
    .await;

    let (status, archived) = send(&app, "POST", &format!("/api/sessions/{id}/archive"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    let game_id = archived["id"].as_str().unwrap();

    let (status, game) = send(&app, "GET", &format!("/api/games/{game_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["id"], game_id);
    assert_eq!(game["payload"]["result"], "0-1");
    assert_eq!(game["payload"]["opening"]["name"], "Fool's Mate");
    assert_eq!(game["payload"]["moves"], json!(["f3", "e5", "g4", "Qh4#"]));
    assert!(game["payload"]["pgn"]
        .as_str()
        .unwrap()
        .contains("1. f3 e5 2. g4 Qh4# 0-1"));
}

#[tokio::test]
async fn test_game_store_evicts_oldest() {
    let (app, _) = setup();
    let mut ids = Vec::new();
    for n in 0..11 {
        let (status, body) = send(&app, "POST", "/api/games", Some(json!({ "n": n }))).await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    let (status, _) = send(&app, "GET", &format!("/api/games/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, game) = send(&app, "GET", &format!("/api/games/{}", ids[10]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["payload"]["n"], 10);

    let (_, listed) = send(&app, "GET", "/api/games", None).await;
    let listed: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed.len(), 10);
    assert_eq!(listed[0], ids[1]);
    assert_eq!(listed[9], ids[10]);
}

#[tokio::test]
async fn test_openings_search_and_cache_header() {
    let (app, _) = setup();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/openings?q=sicilian")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=3600"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let openings: Value = serde_json::from_slice(&bytes).unwrap();
    let openings = openings.as_array().unwrap();
    assert!(!openings.is_empty());
    assert!(openings
        .iter()
        .all(|o| o["name"].as_str().unwrap().to_lowercase().contains("sicilian")));

    let (_, all) = send(&app, "GET", "/api/openings", None).await;
    assert_eq!(all.as_array().unwrap().len(), builtin_database().len());

    let (_, b9) = send(&app, "GET", "/api/openings?eco=B9", None).await;
    assert!(b9
        .as_array()
        .unwrap()
        .iter()
        .all(|o| o["eco"].as_str().unwrap().starts_with("B9")));
}

#[tokio::test]
async fn test_identify_opening() {
    let (app, _) = setup();

    let (status, body) = send(
        &app,
        "POST",
        "/api/openings/identify",
        Some(json!({ "moves": ["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Sicilian Defense");

    let (_, none) = send(
        &app,
        "POST",
        "/api/openings/identify",
        Some(json!({ "moves": ["a3"] })),
    )
    .await;
    assert!(none.is_null());
}
