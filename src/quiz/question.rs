//! Quiz question model

use serde::{Deserialize, Serialize};

/// Wire format of a quiz as delivered by the data provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizEntity {
    pub question: String,
    pub answer: Vec<String>,
}

/// A question and the answers the player has to find
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub title: String,
    pub expected_answers: Vec<String>,
}

impl QuizQuestion {
    pub fn new(title: impl Into<String>, expected_answers: Vec<String>) -> Self {
        Self {
            title: title.into(),
            expected_answers,
        }
    }

    /// Number of expected answers as shown to the player
    pub fn answer_count(&self) -> usize {
        self.expected_answers.len()
    }
}

impl From<QuizEntity> for QuizQuestion {
    fn from(entity: QuizEntity) -> Self {
        Self {
            title: entity.question,
            expected_answers: entity.answer,
        }
    }
}
