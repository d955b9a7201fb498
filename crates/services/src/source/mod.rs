mod open_trivia;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quiz_core::model::{CategoryId, Difficulty, QuizConfig};

use crate::error::SourceError;

pub use open_trivia::{OpenTriviaClient, OpenTriviaConfig};

/// Parameters of a single question-set request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionRequest {
    pub amount: u32,
    pub category: CategoryId,
    pub difficulty: Difficulty,
}

impl From<&QuizConfig> for QuestionRequest {
    fn from(config: &QuizConfig) -> Self {
        Self {
            amount: config.question_count(),
            category: config.category(),
            difficulty: config.difficulty(),
        }
    }
}

/// Question record exactly as the source delivers it (entity-encoded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub category: String,
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
}

/// Envelope returned by the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceResponse {
    pub response_code: u8,
    #[serde(default)]
    pub results: Vec<RawQuestion>,
}

impl SourceResponse {
    pub const SUCCESS: u8 = 0;

    #[must_use]
    pub fn success(results: Vec<RawQuestion>) -> Self {
        Self {
            response_code: Self::SUCCESS,
            results,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response_code == Self::SUCCESS
    }

    /// Human-readable meaning of the response code.
    #[must_use]
    pub fn describe_code(code: u8) -> &'static str {
        match code {
            0 => "success",
            1 => "not enough questions for the chosen settings",
            2 => "invalid request parameter",
            3 => "session token not found",
            4 => "session token has no questions left",
            5 => "too many requests, wait a few seconds",
            _ => "unknown response code",
        }
    }
}

/// External supplier of trivia questions.
///
/// Implementations perform a single attempt per call; retries are left to callers.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch one question set.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` for transport failures or malformed payloads.
    async fn fetch(&self, request: &QuestionRequest) -> Result<SourceResponse, SourceError>;
}
