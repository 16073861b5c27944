//! Timer state structure

use serde::Serialize;

/// Countdown state of the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TimerState {
    Stopped,
    Running { remaining_seconds: u64 },
    Expired,
}

impl TimerState {
    /// Create a running timer state with remaining seconds
    pub fn running(remaining_seconds: u64) -> Self {
        Self::Running { remaining_seconds }
    }

    /// Check if the timer is counting down
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::Stopped
    }
}
