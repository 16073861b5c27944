//! State management module
//!
//! This module contains the session and timer state types and the shared
//! server state handed to the HTTP layer.

pub mod app_state;
pub mod session_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use session_state::{SessionSnapshot, SessionState};
pub use timer_state::TimerState;
