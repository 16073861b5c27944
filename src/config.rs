//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::session::SessionSettings;

const MAX_TICK_INTERVAL: Duration = Duration::from_secs(3600);

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "keyword-quiz")]
#[command(about = "A timed keyword-guessing quiz session served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// JSON file holding the quiz ({"question": ..., "answer": [...]})
    #[arg(short, long, default_value = "data/quiz.json")]
    pub quiz: PathBuf,

    /// Round duration in seconds
    #[arg(short, long, default_value = "300", value_parser = clap::value_parser!(u64).range(1..))]
    pub timer: u64,

    /// Seconds between countdown ticks (at most one hour)
    #[arg(long, default_value = "1.0", value_parser = parse_tick)]
    pub tick: Duration,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Round timing handed to the session runner
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            duration_seconds: self.timer,
            tick_interval: self.tick,
        }
    }
}

fn parse_tick(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|e| format!("invalid tick interval: {}", e))?;
    let interval = Duration::try_from_secs_f64(seconds)
        .map_err(|e| format!("invalid tick interval: {}", e))?;

    if interval.is_zero() || interval > MAX_TICK_INTERVAL {
        return Err(format!(
            "tick interval must be between 0 and {} seconds",
            MAX_TICK_INTERVAL.as_secs()
        ));
    }
    Ok(interval)
}
