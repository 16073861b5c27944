//! Presentation events and side effects produced by session transitions

use serde::Serialize;

use crate::{error::DataSourceError, quiz::QuizQuestion, state::SessionSnapshot};

/// Title, body and dismiss button of a modal dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub title: String,
    pub message: String,
    pub button_text: String,
}

impl ModalView {
    pub fn new(title: &str, message: impl Into<String>, button_text: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            button_text: button_text.to_string(),
        }
    }

    pub fn won() -> Self {
        Self::new(
            "Congratulations",
            "Good job! You found all the answers on time. Keep up with the great work.",
            "Play Again",
        )
    }

    pub fn timed_out(matched: usize, total: usize) -> Self {
        Self::new(
            "Time finished",
            format!(
                "Sorry, time is up! You got {} out of {} answers.",
                matched, total
            ),
            "Try Again",
        )
    }

    pub fn timer_not_started() -> Self {
        Self::new(
            "Ops!",
            "You need to start the timer for your points to count.",
            "OK",
        )
    }

    pub fn load_failed() -> Self {
        Self::new("Ooops!", "Something wrong has happened", "Retry")
    }
}

/// Notification delivered to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum SessionEvent {
    Loading,
    /// Full view content; sent whenever more than the countdown changed
    ContentReady(SessionSnapshot),
    TimerTick {
        remaining_seconds: u64,
        timer_text: String,
    },
    /// A new answer was found; the input field should be cleared
    AnswerAccepted {
        answer: String,
        progress_text: String,
    },
    Won(ModalView),
    TimedOut(ModalView),
    Error(ModalView),
    /// Non-fatal hint, such as answering before the timer was started
    Hint(ModalView),
}

/// Work the session asks its runner to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartClock {
        epoch: u64,
        duration_seconds: u64,
    },
    StopClock,
    Fetch {
        epoch: u64,
    },
}

/// Result of a single state transition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub events: Vec<SessionEvent>,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn event(mut self, event: SessionEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.effects.is_empty()
    }

    /// Append another transition's events and effects after this one's
    pub fn merge(mut self, other: Transition) -> Self {
        self.events.extend(other.events);
        self.effects.extend(other.effects);
        self
    }
}

/// What happened to a submitted answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "answer", rename_all = "snake_case")]
pub enum AnswerOutcome {
    Matched(String),
    Ignored,
    TimerNotRunning,
}

/// Completion of a quiz fetch
pub type FetchResult = Result<QuizQuestion, DataSourceError>;
