//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use quiz_core::model::ScoreError;

/// Errors emitted while loading or validating a `QuizConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("question count must be at least 1")]
    InvalidQuestionCount,
    #[error("difficulty range {min}..={max} is not within 1..=5")]
    InvalidDifficultyRange { min: u8, max: u8 },
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors emitted by quiz sessions and the quiz workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("choice {0} is out of range")]
    InvalidChoice(usize),
    #[error("current question has not been answered")]
    NotAnswered,
    #[error("session is already complete")]
    OutOfSession,
    #[error("no questions available for session")]
    Empty,
    #[error("session is still in progress")]
    NotComplete,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Score(#[from] ScoreError),
}
