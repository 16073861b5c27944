use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use keyword_quiz::{
    api::create_router,
    quiz::QuizQuestion,
    services::StaticSource,
    session::SessionSettings,
    state::{AppState, SessionState},
};
use serde_json::{json, Value};
use tokio::time::timeout;
use tower::ServiceExt;

async fn setup() -> (Arc<AppState>, Router) {
    let source = Arc::new(StaticSource::new(QuizQuestion::new(
        "European capitals",
        vec!["Paris".to_string(), "Rome".to_string()],
    )));
    let state = Arc::new(AppState::new(
        20554,
        "127.0.0.1".to_string(),
        source,
        SessionSettings::default(),
    ));
    let app = create_router(Arc::clone(&state));
    (state, app)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn wait_until_active(state: &AppState) {
    let mut rx = state.session.watch();
    timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.state == SessionState::Active),
    )
    .await
    .unwrap()
    .unwrap();
}

#[tokio::test]
async fn health_reports_ok() {
    let (_, app) = setup().await;

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn full_round_over_http() {
    let (state, app) = setup().await;

    let (status, body) = send(&app, "POST", "/quiz/load", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["state"]["state"], "loading");
    wait_until_active(&state).await;

    let (status, body) = send(&app, "POST", "/quiz/answer", Some(json!({"input": "paris"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["outcome"], "timer_not_running");

    let (status, body) = send(&app, "POST", "/quiz/timer", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["timer"]["status"], "running");
    assert_eq!(body["session"]["button_label"], "Reset");

    let (_, body) = send(&app, "POST", "/quiz/answer", Some(json!({"input": "Paris "}))).await;
    assert_eq!(body["outcome"], json!({"outcome": "matched", "answer": "Paris"}));
    assert_eq!(body["session"]["progress_text"], "01/02");

    let (_, body) = send(&app, "POST", "/quiz/answer", Some(json!({"input": "london"}))).await;
    assert_eq!(body["outcome"]["outcome"], "ignored");

    let (_, body) = send(&app, "POST", "/quiz/answer", Some(json!({"input": "rome"}))).await;
    assert_eq!(body["session"]["state"]["state"], "won");

    let (status, body) = send(&app, "GET", "/quiz/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["state"]["state"], "won");
    assert_eq!(body["round_seconds"], 300);
    assert_eq!(body["last_action"], "answer");
}

#[tokio::test]
async fn invalid_transitions_return_conflict() {
    let (state, app) = setup().await;

    let (status, body) = send(&app, "POST", "/quiz/timer", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    send(&app, "POST", "/quiz/load", None).await;
    wait_until_active(&state).await;

    let (status, _) = send(&app, "POST", "/quiz/load", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn reset_reloads_the_question() {
    let (state, app) = setup().await;
    send(&app, "POST", "/quiz/load", None).await;
    wait_until_active(&state).await;
    send(&app, "POST", "/quiz/timer", None).await;

    let (status, body) = send(&app, "POST", "/quiz/reset", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["state"]["state"], "loading");
    wait_until_active(&state).await;
    assert_eq!(state.session.snapshot().progress_text, "00/02");
}
