//! Integration tests for the HTTP API endpoints.
//!
//! Uses axum's oneshot pattern (via tower::ServiceExt), no TCP binding needed.
//! Each test builds its own state on an in-memory store and clones the router
//! per request so runs survive across calls.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use brainplay::config::GamesConfig;
use brainplay::routes::build_router;
use brainplay::state::AppState;
use brainplay::storage::{JsonFileStore, MemoryStore};

fn app() -> Router {
    let state = AppState::with_parts(GamesConfig::default(), Arc::new(MemoryStore::new()));
    build_router(Arc::new(state))
}

/// Parse response body as JSON.
async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    (status, body_json(resp.into_body()).await)
}

async fn send(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    (status, body_json(resp.into_body()).await)
}

async fn start(app: &Router, game: &str, rounds: u32) -> String {
    let (status, json) = send(app, "POST", "/api/v1/games", json!({ "gameType": game, "rounds": rounds, "seed": 7 })).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    json["runId"].as_str().unwrap().to_string()
}

// ── GET /api/v1/health ───────────────────────────────────────────────

#[tokio::test]
async fn health_returns_200() {
    let (status, json) = get(&app(), "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
}

// ── Color game, answered from the public view ────────────────────────

#[tokio::test]
async fn color_game_full_run() {
    let app = app();
    let run = start(&app, "color", 2).await;

    for round in 1..=2 {
        let (status, q) = get(&app, &format!("/api/v1/games/{run}/question")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(q["round"], round);
        assert_eq!(q["phase"], "answering");
        let view = &q["question"];
        assert_eq!(view["game"], "color");
        assert!(view.get("correct_option_index").is_none());

        let ink = view["inkHex"].as_str().unwrap();
        let idx = view["options"]
            .as_array()
            .unwrap()
            .iter()
            .position(|o| o["hex"] == ink)
            .unwrap();

        let (status, out) = send(
            &app,
            "POST",
            &format!("/api/v1/games/{run}/answer"),
            json!({ "questionId": q["id"], "answer": { "game": "color", "option_index": idx } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["verdict"], "correct");
        assert_eq!(out["correct"], true);
        assert_eq!(out["runComplete"], round == 2);
    }

    let (status, done) = send(&app, "POST", &format!("/api/v1/games/{run}/finish"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["sequence"], 0);
    assert_eq!(done["rank"], "Mastermind");
    assert_eq!(done["record"]["score"], json!({ "correct": 2, "total": 2, "accuracy": 100 }));

    let (_, stats) = get(&app, "/api/v1/stats?gameType=color").await;
    assert_eq!(stats["stats"]["played_count"], 1);
    assert_eq!(stats["stats"]["best_accuracy"], 100);
    let (_, stats) = get(&app, "/api/v1/stats?gameType=head_count").await;
    assert_eq!(stats["stats"]["played_count"], 0);
}

// ── Memory game, targets fetched through the reveal endpoint ─────────

#[tokio::test]
async fn memory_game_uses_reveal() {
    let app = app();
    let run = start(&app, "memory", 1).await;
    let (_, q) = get(&app, &format!("/api/v1/games/{run}/question")).await;
    assert_eq!(q["phase"], "ready");
    assert_eq!(q["revealLen"], 1);
    let qid = q["id"].as_str().unwrap();

    let (status, shown) = get(&app, &format!("/api/v1/games/{run}/reveal/{qid}/0")).await;
    assert_eq!(status, StatusCode::OK);
    let items = shown["reveal"]["items"].clone();
    assert_eq!(items.as_array().unwrap().len(), 4);

    let (status, out) = send(
        &app,
        "POST",
        &format!("/api/v1/games/{run}/answer"),
        json!({ "questionId": qid, "answer": { "game": "memory", "items": items } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["correct"], true);

    // Second answer to the same question is stale.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/games/{run}/answer"),
        json!({ "questionId": qid, "answer": { "game": "memory", "items": items } }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ── Error mapping ────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_run_is_404() {
    let (status, json) = get(&app(), "/api/v1/games/does-not-exist/question").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("does-not-exist"));
}

#[tokio::test]
async fn answer_before_presentation_is_409() {
    let app = app();
    let run = start(&app, "head_count", 1).await;
    let (_, q) = get(&app, &format!("/api/v1/games/{run}/question")).await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/games/{run}/answer"),
        json!({ "questionId": q["id"], "answer": { "game": "head_count", "count": 3 } }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn mismatched_answer_is_400() {
    let app = app();
    let run = start(&app, "path", 1).await;
    let (_, q) = get(&app, &format!("/api/v1/games/{run}/question")).await;
    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/v1/games/{run}/answer"),
        json!({ "questionId": q["id"], "answer": { "game": "color", "option_index": 0 } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("path"));
}

#[tokio::test]
async fn zero_rounds_is_400() {
    let (status, _) = send(&app(), "POST", "/api/v1/games", json!({ "gameType": "blink", "rounds": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Profile and settings ─────────────────────────────────────────────

#[tokio::test]
async fn profile_and_settings_round_trip() {
    let app = app();
    let (status, profile) = get(&app, "/api/v1/profile").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], "");

    let body = json!({ "name": "Leo", "age": 6, "avatar": "🐼" });
    let (status, _) = send(&app, "PUT", "/api/v1/profile", body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let (_, profile) = get(&app, "/api/v1/profile").await;
    assert_eq!(profile, body);

    let (status, _) = send(&app, "PUT", "/api/v1/settings", json!({ "language": "es", "dark_mode": true })).await;
    assert_eq!(status, StatusCode::OK);
    let (_, settings) = get(&app, "/api/v1/settings").await;
    assert_eq!(settings["language"], "es");
    assert_eq!(settings["dark_mode"], true);
}

#[tokio::test]
async fn empty_profile_name_is_400() {
    let (status, _) = send(&app(), "PUT", "/api/v1/profile", json!({ "name": "  ", "age": null, "avatar": "🐼" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Persistence across restarts ──────────────────────────────────────

#[tokio::test]
async fn history_survives_restart_with_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brainplay.json");

    let first = build_router(Arc::new(AppState::with_parts(
        GamesConfig::default(),
        Arc::new(JsonFileStore::open(&path).unwrap()),
    )));
    let run = start(&first, "calendar", 3).await;
    let (status, _) = send(&first, "POST", &format!("/api/v1/games/{run}/finish"), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let second = build_router(Arc::new(AppState::with_parts(
        GamesConfig::default(),
        Arc::new(JsonFileStore::open(&path).unwrap()),
    )));
    let (_, stats) = get(&second, "/api/v1/stats").await;
    assert_eq!(stats["stats"]["played_count"], 1);
    assert_eq!(stats["gameType"], Value::Null);
}
