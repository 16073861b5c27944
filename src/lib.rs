//! Keyword Quiz - a timed keyword-guessing quiz session
//!
//! A question comes with a fixed list of expected answers. While a countdown
//! runs the player types answers; the session tracks matches and ends in a
//! win or a time-out. The session is served over HTTP with a Server-Sent
//! Events stream for the presentation layer.

pub mod api;
pub mod config;
pub mod error;
pub mod quiz;
pub mod services;
pub mod session;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{DataSourceError, SessionError};
pub use session::{SessionEvent, SessionHandle, SessionSettings};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
