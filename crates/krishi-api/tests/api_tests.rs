//! Integration tests for the command API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. Timers never run: the session is built on a
//! manual scheduler that nobody advances.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, missing_docs)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use krishi_api::{AppState, build_router};
use krishi_core::{Clock, GameConfig, GameSession, ManualClock, ManualScheduler, MemoryStorage};
use krishi_types::EventPayload;
use serde_json::{Value, json};
use tower::ServiceExt;

fn make_state(configure: impl FnOnce(&mut GameConfig)) -> Arc<AppState> {
    let mut config = GameConfig::default();
    config.game.seed = Some(3);
    configure(&mut config);
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(Utc::now()));
    let session = GameSession::open(
        config,
        clock,
        Arc::new(ManualScheduler::new()),
        Arc::new(MemoryStorage::new()),
    );
    Arc::new(AppState::new(Arc::new(session)))
}

fn router(state: &Arc<AppState>) -> Router {
    build_router(Arc::clone(state))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(state: &Arc<AppState>, path: &str) -> (StatusCode, Value) {
    let response = router(state)
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post(state: &Arc<AppState>, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::post(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::post(path).body(Body::empty()).unwrap(),
    };
    let response = router(state).oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn first_plot_id(state: &Arc<AppState>) -> String {
    state.session.snapshot().plots[0].id.to_string()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_get_state() {
    let state = make_state(|_| {});
    let (status, json) = get(&state, "/api/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["coins"], 1250);
    assert_eq!(json["level"], 1);
    assert_eq!(json["weather"]["weather"], "sunny");
    assert_eq!(json["plots"].as_array().unwrap().len(), 9);
    assert_eq!(json["crops"].as_array().unwrap().len(), 6);
    assert_eq!(json["active_mission"]["id"], "crop-rotation");
    assert!(json["overdue_missions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_plots() {
    let state = make_state(|c| c.game.plot_count = 4);
    let (status, json) = get(&state, "/api/plots").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 4);
    assert_eq!(json[0]["planted"], false);
}

#[tokio::test]
async fn test_plant_then_replant_conflicts() {
    let state = make_state(|_| {});
    let path = format!("/api/plots/{}/plant", first_plot_id(&state));

    let (status, json) = post(&state, &path, Some(json!({ "crop_id": "wheat" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["plot"]["crop"], "wheat");
    assert_eq!(json["plot"]["growth_stage"], 10);
    assert_eq!(json["coins"], 1300);

    let (status, json) = post(&state, &path, Some(json!({ "crop_id": "rice" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["status"], 409);
    assert!(json["error"].as_str().unwrap().contains("already planted"));
}

#[tokio::test]
async fn test_plant_unknown_crop_not_found() {
    let state = make_state(|_| {});
    let path = format!("/api/plots/{}/plant", first_plot_id(&state));
    let (status, _) = post(&state, &path, Some(json!({ "crop_id": "mango" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_plot_not_found() {
    let state = make_state(|_| {});
    let path = format!("/api/plots/{}/water", uuid::Uuid::now_v7());
    let (status, _) = post(&state, &path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_plot_uuid() {
    let state = make_state(|_| {});
    let (status, json) = post(&state, "/api/plots/not-a-uuid/water", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_water_and_fertilize() {
    let state = make_state(|_| {});
    let id = first_plot_id(&state);

    let (status, _) = post(&state, &format!("/api/plots/{id}/water"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    post(&state, &format!("/api/plots/{id}/plant"), Some(json!({ "crop_id": "tomato" }))).await;
    let (status, json) = post(&state, &format!("/api/plots/{id}/water"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["plot"]["water_level"], 80);

    let (status, json) = post(
        &state,
        &format!("/api/plots/{id}/fertilize"),
        Some(json!({ "kind": "chemical" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["plot"]["fertilizer"], "chemical");
    assert_eq!(json["plot"]["sustainability_score"], 85);

    let (status, _) = post(
        &state,
        &format!("/api/plots/{id}/fertilize"),
        Some(json!({ "kind": "none" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_harvest_not_ready_then_ready() {
    let state = make_state(|_| {});
    let id = first_plot_id(&state);
    post(&state, &format!("/api/plots/{id}/plant"), Some(json!({ "crop_id": "corn" }))).await;
    let (status, _) = post(&state, &format!("/api/plots/{id}/harvest"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let ready = make_state(|c| c.growth.seed_stage = 100);
    let id = first_plot_id(&ready);
    post(&ready, &format!("/api/plots/{id}/plant"), Some(json!({ "crop_id": "corn" }))).await;
    let (status, json) = post(&ready, &format!("/api/plots/{id}/harvest"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["harvest_yield"], 200);
    assert_eq!(json["crop_id"], "corn");
    assert_eq!(json["plot"]["planted"], false);
    assert_eq!(json["coins"], 1250 + 50 + 200);
}

#[tokio::test]
async fn test_quiz_submission() {
    let state = make_state(|_| {});
    let answers = json!({ "answers": { "q1": 1, "q2": 1, "q3": 0 } });
    let (status, json) = post(&state, "/api/quizzes/traditional-farming-quiz/submit", Some(answers)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["passed"], false);
    assert_eq!(json["score"], 66);
    assert_eq!(json["reward"], 0);

    let answers = json!({ "answers": { "q1": 1, "q2": 1, "q3": 1 } });
    let (_, json) = post(&state, "/api/quizzes/traditional-farming-quiz/submit", Some(answers)).await;
    assert_eq!(json["passed"], true);
    assert_eq!(json["reward"], 100);
    assert_eq!(json["coins"], 1350);

    let (status, _) = post(&state, "/api/quizzes/astronomy/submit", Some(json!({ "answers": {} }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missions_and_photo_proof() {
    let state = make_state(|_| {});

    let (status, json) = post(&state, "/api/missions/crop-rotation/complete", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reward"], 250);

    let (status, _) = post(&state, "/api/missions/crop-rotation/complete", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post(&state, "/api/missions/water-conservation/complete", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, json) = post(&state, "/api/missions/water-conservation/photo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reward"], 100);

    let (status, json) = post(&state, "/api/missions/water-conservation/complete", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["coins"], 1250 + 250 + 100 + 300);

    let (status, _) = post(&state, "/api/missions/moon-farming/complete", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_evaluate_achievements_with_nothing_earned() {
    let state = make_state(|_| {});
    let (status, json) = post(&state, "/api/achievements/evaluate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["unlocked"].as_array().unwrap().is_empty());
    assert_eq!(json["coins"], 1250);
}

#[tokio::test]
async fn test_purchase() {
    let state = make_state(|_| {});
    let cart = json!({ "items": [{ "name": "Tractor", "cost": 5000 }] });
    let (status, json) = post(&state, "/api/store/purchase", Some(cart)).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(json["status"], 402);

    let cart = json!({ "items": [{ "name": "Seeds", "cost": 200 }, { "name": "Compost", "cost": 50 }] });
    let (status, json) = post(&state, "/api/store/purchase", Some(cart)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["entry"]["applied"], -250);
    assert_eq!(json["coins"], 1000);
}

#[tokio::test]
async fn test_commands_publish_events() {
    let state = make_state(|_| {});
    let mut rx = state.subscribe();
    post(&state, "/api/missions/crop-rotation/complete", None).await;

    assert!(matches!(
        rx.try_recv().unwrap().payload,
        EventPayload::MissionCompleted { reward: 250, .. }
    ));
    assert!(matches!(
        rx.try_recv().unwrap().payload,
        EventPayload::CoinsChanged { balance: 1500, .. }
    ));
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let state = make_state(|_| {});
    let response = router(&state)
        .oneshot(Request::get("/api/nonexistent").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
