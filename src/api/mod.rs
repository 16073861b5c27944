//! HTTP API module
//!
//! This module exposes the quiz session lifecycle to a remote presentation
//! layer: JSON commands, a status snapshot and a Server-Sent-Events stream.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/quiz/load", post(load_handler))
        .route("/quiz/timer", post(timer_handler))
        .route("/quiz/answer", post(answer_handler))
        .route("/quiz/reset", post(reset_handler))
        .route("/quiz/status", get(status_handler))
        .route("/quiz/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
