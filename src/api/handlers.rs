//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};

use super::responses::{AnswerRequest, ApiResponse, ErrorResponse, HealthResponse, StatusResponse};
use crate::{
    error::SessionError,
    session::{AnswerOutcome, SessionEvent},
    state::AppState,
};

/// Session error mapped onto an HTTP status
pub struct ApiError(SessionError);

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SessionError::InvalidTransition { .. } => StatusCode::CONFLICT,
            _ => StatusCode::SERVICE_UNAVAILABLE,
        };
        if status == StatusCode::CONFLICT {
            warn!("Rejected session command: {}", self.0);
        } else {
            error!("Session unavailable: {}", self.0);
        }
        (status, Json(ErrorResponse::new(self.0.to_string()))).into_response()
    }
}

/// Handle POST /quiz/load - Fetch a question
pub async fn load_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, ApiError> {
    let snapshot = state.session.load().await?;
    state.record_action("load");
    info!("Load endpoint called - quiz loading");
    Ok(Json(ApiResponse::ok("Quiz loading", snapshot)))
}

/// Handle POST /quiz/timer - Start the timer, or stop it and forfeit progress
pub async fn timer_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, ApiError> {
    let snapshot = state.session.toggle_timer().await?;
    let message = if snapshot.timer.is_running() {
        state.record_action("timer-start");
        "Timer started"
    } else {
        state.record_action("timer-stop");
        "Timer stopped, progress cleared"
    };
    info!("Timer endpoint called - {}", message);
    Ok(Json(ApiResponse::ok(message, snapshot)))
}

/// Handle POST /quiz/answer - Check a typed answer
pub async fn answer_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let (outcome, snapshot) = state.session.submit_answer(request.input).await?;
    state.record_action("answer");

    let message = match &outcome {
        AnswerOutcome::Matched(answer) => format!("Found {}", answer),
        AnswerOutcome::Ignored => "No new answer".to_string(),
        AnswerOutcome::TimerNotRunning => {
            "You need to start the timer for your points to count.".to_string()
        }
    };
    Ok(Json(ApiResponse::ok(message, snapshot).with_outcome(outcome)))
}

/// Handle POST /quiz/reset - Abandon the round and reload
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, ApiError> {
    let snapshot = state.session.reset().await?;
    state.record_action("reset");
    info!("Reset endpoint called - quiz reloading");
    Ok(Json(ApiResponse::ok("Quiz reset", snapshot)))
}

/// Handle GET /quiz/status - Return the current session snapshot
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        session: state.session.snapshot(),
        round_seconds: state.settings.duration_seconds,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /quiz/events - Stream presentation events as Server-Sent Events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Presentation client subscribed to session events");
    Sse::new(event_stream(state.session.subscribe())).keep_alive(KeepAlive::default())
}

fn event_stream(
    receiver: broadcast::Receiver<SessionEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => match Event::default().json_data(&event) {
                    Ok(sse) => return Some((Ok(sse), receiver)),
                    Err(e) => error!("Failed to encode session event: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
