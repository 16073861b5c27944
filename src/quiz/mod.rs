//! Quiz domain module
//!
//! Pure building blocks of a quiz round: the question model, answer matching
//! and countdown formatting. Nothing here touches the runtime.

pub mod formatter;
pub mod matcher;
pub mod question;

// Re-export main types
pub use formatter::format_countdown;
pub use matcher::{matched_answers, normalize, submit, AnswerProgress};
pub use question::{QuizEntity, QuizQuestion};
