//! Session state and its serializable snapshot

use std::fmt;

use serde::Serialize;

use super::TimerState;

/// Lifecycle state of a quiz session. Exactly one holds at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Loading,
    Active,
    Won,
    TimedOut,
    Error(String),
}

impl SessionState {
    /// Short name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Active => "active",
            Self::Won => "won",
            Self::TimedOut => "timed_out",
            Self::Error(_) => "error",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read model of a session, as rendered by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub timer: TimerState,
    pub title: Option<String>,
    pub answer_count: usize,
    pub matched_answers: Vec<String>,
    pub progress_text: String,
    pub timer_text: String,
    pub button_label: String,
    pub input_placeholder: String,
}
