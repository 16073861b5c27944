//! Quiz session state machine
//!
//! `QuizSession` is a reducer: every entry point mutates the session in one
//! step and returns a [`Transition`] listing the presentation events to publish
//! and the effects (clock and fetch requests) the runner has to carry out.
//! Clock and fetch completions carry the epoch they were started with, so a
//! completion from a superseded run never touches the current round.

use tracing::{debug, info, warn};

use super::events::{AnswerOutcome, Effect, FetchResult, ModalView, SessionEvent, Transition};
use crate::{
    error::SessionError,
    quiz::{format_countdown, matched_answers, normalize, submit, AnswerProgress, QuizQuestion},
    state::{SessionSnapshot, SessionState, TimerState},
};

const START_LABEL: &str = "Start";
const RESET_LABEL: &str = "Reset";
const INPUT_PLACEHOLDER: &str = "Insert Word";

#[derive(Debug)]
pub struct QuizSession {
    duration_seconds: u64,
    state: SessionState,
    question: Option<QuizQuestion>,
    progress: AnswerProgress,
    timer: TimerState,
    clock_epoch: u64,
    load_epoch: u64,
}

impl QuizSession {
    /// Create an idle session whose rounds last `duration_seconds`
    pub fn new(duration_seconds: u64) -> Self {
        Self {
            duration_seconds: duration_seconds.max(1),
            state: SessionState::Idle,
            question: None,
            progress: AnswerProgress::default(),
            timer: TimerState::Stopped,
            clock_epoch: 0,
            load_epoch: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn timer(&self) -> TimerState {
        self.timer
    }

    pub fn progress(&self) -> &AnswerProgress {
        &self.progress
    }

    /// Build the read model rendered by the presentation layer
    pub fn snapshot(&self) -> SessionSnapshot {
        let expected = self
            .question
            .as_ref()
            .map(|q| q.expected_answers.as_slice())
            .unwrap_or_default();

        let timer_text = match self.timer {
            TimerState::Running { remaining_seconds } => format_countdown(remaining_seconds),
            TimerState::Expired => format_countdown(0),
            TimerState::Stopped => format_countdown(self.duration_seconds),
        };

        let button_label = if self.timer.is_running() {
            RESET_LABEL
        } else {
            START_LABEL
        };

        SessionSnapshot {
            state: self.state.clone(),
            timer: self.timer,
            title: self.question.as_ref().map(|q| q.title.clone()),
            answer_count: self.progress.total,
            matched_answers: matched_answers(&self.progress, expected),
            progress_text: self.progress_text(),
            timer_text,
            button_label: button_label.to_string(),
            input_placeholder: INPUT_PLACEHOLDER.to_string(),
        }
    }

    fn progress_text(&self) -> String {
        format!("{:02}/{:02}", self.progress.matched_count(), self.progress.total)
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            state: self.state.name(),
        }
    }

    fn content_ready(&self) -> SessionEvent {
        SessionEvent::ContentReady(self.snapshot())
    }

    /// Request a question from the data source.
    ///
    /// A load issued while another is pending supersedes it.
    pub fn load(&mut self) -> Result<Transition, SessionError> {
        match self.state {
            SessionState::Active => Err(self.invalid("load")),
            SessionState::Loading => {
                debug!("Superseding pending load {}", self.load_epoch);
                Ok(self.begin_load())
            }
            _ => Ok(self.begin_load()),
        }
    }

    fn begin_load(&mut self) -> Transition {
        self.load_epoch += 1;
        self.state = SessionState::Loading;
        self.question = None;
        self.progress = AnswerProgress::default();
        self.timer = TimerState::Stopped;

        info!("Loading quiz (load {})", self.load_epoch);
        Transition::none()
            .event(SessionEvent::Loading)
            .effect(Effect::Fetch {
                epoch: self.load_epoch,
            })
    }

    /// Apply the completion of the fetch started by load `epoch`
    pub fn fetch_completed(&mut self, epoch: u64, result: FetchResult) -> Transition {
        if epoch != self.load_epoch || self.state != SessionState::Loading {
            debug!("Ignoring stale fetch completion for load {}", epoch);
            return Transition::none();
        }

        match result {
            Ok(question) => {
                info!(
                    "Quiz loaded: {:?} with {} answers",
                    question.title,
                    question.answer_count()
                );
                self.progress = AnswerProgress::for_answers(&question.expected_answers);
                self.question = Some(question);
                self.timer = TimerState::Stopped;
                self.state = SessionState::Active;
                Transition::none().event(self.content_ready())
            }
            Err(err) => {
                warn!("Quiz load failed: {}", err);
                self.state = SessionState::Error(err.to_string());
                Transition::none().event(SessionEvent::Error(ModalView::load_failed()))
            }
        }
    }

    /// Start the countdown, or stop it and forfeit the round's progress
    pub fn toggle_timer(&mut self) -> Result<Transition, SessionError> {
        match self.state {
            SessionState::Active if self.timer.is_running() => {
                info!("Timer stopped by player, progress forfeited");
                let stop = self.stop_clock();
                self.progress = self.progress.cleared();
                Ok(stop.event(self.content_ready()))
            }
            SessionState::Active => Ok(self.start_clock()),
            SessionState::Won | SessionState::TimedOut => {
                info!("Starting a new round on the same question");
                self.progress = self.progress.cleared();
                Ok(self.start_clock())
            }
            _ => Err(self.invalid("toggle the timer")),
        }
    }

    fn start_clock(&mut self) -> Transition {
        self.clock_epoch += 1;
        self.timer = TimerState::running(self.duration_seconds);
        self.state = SessionState::Active;

        info!(
            "Timer started for {}s (clock {})",
            self.duration_seconds, self.clock_epoch
        );
        Transition::none()
            .effect(Effect::StartClock {
                epoch: self.clock_epoch,
                duration_seconds: self.duration_seconds,
            })
            .event(self.content_ready())
    }

    /// Stop the clock and invalidate anything it already queued
    fn stop_clock(&mut self) -> Transition {
        self.clock_epoch += 1;
        self.timer = TimerState::Stopped;
        Transition::none().effect(Effect::StopClock)
    }

    /// Check a typed answer against the expected answers
    pub fn submit_answer(&mut self, input: &str) -> (AnswerOutcome, Transition) {
        if !self.timer.is_running() {
            debug!("Answer submitted while timer is not running");
            return (
                AnswerOutcome::TimerNotRunning,
                Transition::none().event(SessionEvent::Hint(ModalView::timer_not_started())),
            );
        }

        let Some(question) = self.question.as_ref() else {
            return (AnswerOutcome::Ignored, Transition::none());
        };

        let next = submit(input, &self.progress, &question.expected_answers);
        if next == self.progress {
            return (AnswerOutcome::Ignored, Transition::none());
        }

        let key = normalize(input);
        let answer = question
            .expected_answers
            .iter()
            .find(|a| normalize(a) == key)
            .cloned()
            .unwrap_or(key);
        self.progress = next;

        info!(
            "Answer matched: {:?} ({}/{})",
            answer,
            self.progress.matched_count(),
            self.progress.total
        );
        let mut transition = Transition::none().event(SessionEvent::AnswerAccepted {
            answer: answer.clone(),
            progress_text: self.progress_text(),
        });

        if self.progress.is_complete() {
            info!("All answers found, round won");
            transition = transition.merge(self.stop_clock());
            self.state = SessionState::Won;
            transition = transition
                .event(self.content_ready())
                .event(SessionEvent::Won(ModalView::won()));
        } else {
            transition = transition.event(self.content_ready());
        }

        (AnswerOutcome::Matched(answer), transition)
    }

    /// Apply a countdown tick from clock `epoch`
    pub fn tick(&mut self, epoch: u64, remaining_seconds: u64) -> Transition {
        if epoch != self.clock_epoch || !self.timer.is_running() {
            debug!("Ignoring stale tick from clock {}", epoch);
            return Transition::none();
        }

        self.timer = TimerState::running(remaining_seconds);
        Transition::none().event(SessionEvent::TimerTick {
            remaining_seconds,
            timer_text: format_countdown(remaining_seconds),
        })
    }

    /// Apply the expiry of clock `epoch`
    pub fn finish(&mut self, epoch: u64) -> Transition {
        if epoch != self.clock_epoch || !self.timer.is_running() {
            debug!("Ignoring stale expiry from clock {}", epoch);
            return Transition::none();
        }

        info!(
            "Time is up with {}/{} answers",
            self.progress.matched_count(),
            self.progress.total
        );
        self.timer = TimerState::Expired;
        self.state = SessionState::TimedOut;
        Transition::none()
            .event(self.content_ready())
            .event(SessionEvent::TimedOut(ModalView::timed_out(
                self.progress.matched_count(),
                self.progress.total,
            )))
    }

    /// Abandon the round and load a fresh question
    pub fn reset(&mut self) -> Result<Transition, SessionError> {
        match self.state {
            SessionState::Active | SessionState::Won | SessionState::TimedOut => {
                info!("Resetting quiz session");
                let stop = self.stop_clock();
                self.progress = self.progress.cleared();
                Ok(stop.merge(self.begin_load()))
            }
            _ => Err(self.invalid("reset")),
        }
    }
}
