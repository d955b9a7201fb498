//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{ConfigError, SessionPhase};

/// Errors emitted by a `QuestionSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("invalid question source url: {0}")]
    Url(#[from] url::ParseError),
    #[error("question source returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("question source request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed question payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors emitted by `QuizController`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("cannot {operation} while {phase}")]
    InvalidState {
        operation: &'static str,
        phase: SessionPhase,
    },
    #[error("{message}")]
    InsufficientQuestions { message: String },
    #[error("{message}")]
    Transport { message: String },
    #[error("{0:?} is not one of the current answer choices")]
    UnknownAnswer(String),
}
