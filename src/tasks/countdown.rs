//! Countdown clock background task

use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Cancellable, restartable countdown running as a tokio task.
///
/// Each tick subtracts the tick interval (rounded to whole seconds, at least
/// one) from the remaining time and reports it through `on_tick`. When the
/// remaining time reaches zero `on_finish` is called once and the task ends.
#[derive(Debug, Default)]
pub struct CountdownClock {
    handle: Option<JoinHandle<()>>,
}

impl CountdownClock {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Start counting down, cancelling any run in progress first
    pub fn start<T, F>(
        &mut self,
        duration_seconds: u64,
        tick_interval: Duration,
        on_tick: T,
        on_finish: F,
    ) where
        T: Fn(u64) + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        self.stop();

        let period = tick_interval.max(MIN_TICK_INTERVAL);
        let step = tick_step(period);
        debug!(
            "Starting countdown: {}s, ticking every {:?} by {}s",
            duration_seconds, period, step
        );

        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut remaining = duration_seconds;
            while remaining > 0 {
                interval.tick().await;
                remaining = remaining.saturating_sub(step);
                on_tick(remaining);
            }

            on_finish();
        }));
    }

    /// Cancel pending ticks; safe to call when not running
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                debug!("Cancelling countdown");
            }
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CountdownClock {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Whole seconds removed from the countdown on each tick
fn tick_step(period: Duration) -> u64 {
    (period.as_secs_f64().round() as u64).max(1)
}
