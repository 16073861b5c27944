//! Quiz data sources

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    error::DataSourceError,
    quiz::{QuizEntity, QuizQuestion},
};

/// Supplies the question and expected answers for a session.
///
/// Every call to `fetch` completes exactly once with the whole question.
#[async_trait]
pub trait QuizDataSource: Send + Sync {
    async fn fetch(&self) -> Result<QuizQuestion, DataSourceError>;
}

/// Reads a quiz entity (`{"question": ..., "answer": [...]}`) from a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuizDataSource for JsonFileSource {
    async fn fetch(&self) -> Result<QuizQuestion, DataSourceError> {
        debug!("Reading quiz from {}", self.path.display());

        let raw = tokio::fs::read_to_string(&self.path).await?;
        let question = parse_quiz(&raw)?;

        info!(
            "Read quiz {:?} from {}",
            question.title,
            self.path.display()
        );
        Ok(question)
    }
}

/// Serves a fixed question from memory
#[derive(Debug, Clone)]
pub struct StaticSource {
    question: QuizQuestion,
}

impl StaticSource {
    pub fn new(question: QuizQuestion) -> Self {
        Self { question }
    }
}

#[async_trait]
impl QuizDataSource for StaticSource {
    async fn fetch(&self) -> Result<QuizQuestion, DataSourceError> {
        Ok(self.question.clone())
    }
}

/// Decode a quiz entity and validate it
pub fn parse_quiz(raw: &str) -> Result<QuizQuestion, DataSourceError> {
    let entity: QuizEntity = serde_json::from_str(raw)?;
    if entity.question.trim().is_empty() {
        return Err(DataSourceError::EmptyQuestion);
    }
    Ok(entity.into())
}
