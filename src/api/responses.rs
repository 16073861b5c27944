//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{session::AnswerOutcome, state::SessionSnapshot};

/// Body of POST /quiz/answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub input: String,
}

/// API response structure for session commands
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<AnswerOutcome>,
    pub session: SessionSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: impl Into<String>, session: SessionSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            outcome: None,
            session,
        }
    }

    /// Create a success response
    pub fn ok(message: impl Into<String>, session: SessionSnapshot) -> Self {
        Self::new("ok", message, session)
    }

    /// Attach the outcome of a submitted answer
    pub fn with_outcome(mut self, outcome: AnswerOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }
}

/// Error body returned alongside a non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub session: SessionSnapshot,
    pub round_seconds: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
