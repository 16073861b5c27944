//! Quiz session module
//!
//! The session state machine, the events it publishes and the runner task
//! that owns it.

pub mod events;
pub mod machine;
pub mod runner;

// Re-export main types
pub use events::{AnswerOutcome, Effect, ModalView, SessionEvent, Transition};
pub use machine::QuizSession;
pub use runner::{SessionHandle, SessionSettings};
