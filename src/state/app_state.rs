//! Shared server state

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::{
    services::QuizDataSource,
    session::{SessionHandle, SessionSettings},
};

/// State shared by every HTTP handler
#[derive(Debug)]
pub struct AppState {
    /// Handle to the quiz session runner
    pub session: SessionHandle,
    /// Round timing the session was started with
    pub settings: SessionSettings,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<(String, DateTime<Utc>)>>>,
}

impl AppState {
    /// Spawn a session over `source` and wrap it with server metadata
    pub fn new(
        port: u16,
        host: String,
        source: Arc<dyn QuizDataSource>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            session: SessionHandle::spawn(source, settings),
            settings,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
        }
    }

    /// Record the last player action
    pub fn record_action(&self, action: &str) {
        match self.last_action.lock() {
            Ok(mut last_action) => *last_action = Some((action.to_string(), Utc::now())),
            Err(e) => warn!("Failed to lock last action: {}", e),
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| a.clone()) {
            Some((action, time)) => (Some(action), Some(time)),
            None => (None, None),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }
}

fn format_uptime(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
