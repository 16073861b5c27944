//! External collaborators module
//!
//! This module contains the quiz data sources the session loads questions from.

pub mod data_source;

// Re-export main types
pub use data_source::{parse_quiz, JsonFileSource, QuizDataSource, StaticSource};
