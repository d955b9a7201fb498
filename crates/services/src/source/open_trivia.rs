use std::env;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{QuestionRequest, QuestionSource, SourceResponse};
use crate::error::SourceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenTriviaConfig {
    pub base_url: String,
}

impl OpenTriviaConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://opentdb.com";

    /// Reads `QUIZ_API_BASE_URL`, falling back to the public Open Trivia DB.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("QUIZ_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.into());
        Self { base_url }
    }
}

impl Default for OpenTriviaConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.into(),
        }
    }
}

/// HTTP client for the Open Trivia DB `api.php` endpoint.
#[derive(Clone, Debug)]
pub struct OpenTriviaClient {
    client: Client,
    config: OpenTriviaConfig,
}

impl OpenTriviaClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(OpenTriviaConfig::from_env())
    }

    #[must_use]
    pub fn new(config: OpenTriviaConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &OpenTriviaConfig {
        &self.config
    }

    /// Build the request URL for a question set.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Url` if the configured base URL is not a valid URL.
    pub fn endpoint(&self, request: &QuestionRequest) -> Result<Url, SourceError> {
        let base = format!("{}/api.php", self.config.base_url.trim_end_matches('/'));
        let url = Url::parse_with_params(
            &base,
            &[
                ("amount", request.amount.to_string()),
                ("category", request.category.to_string()),
                ("difficulty", request.difficulty.as_str().to_string()),
            ],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl QuestionSource for OpenTriviaClient {
    async fn fetch(&self, request: &QuestionRequest) -> Result<SourceResponse, SourceError> {
        let url = self.endpoint(request)?;
        tracing::debug!(%url, "requesting question set");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        let parsed: SourceResponse = serde_json::from_str(&body)?;
        tracing::debug!(
            response_code = parsed.response_code,
            results = parsed.results.len(),
            "question set received"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{CategoryId, Difficulty};

    fn request() -> QuestionRequest {
        QuestionRequest {
            amount: 5,
            category: CategoryId::new(21),
            difficulty: Difficulty::Hard,
        }
    }

    #[test]
    fn endpoint_carries_all_parameters() {
        let client = OpenTriviaClient::new(OpenTriviaConfig::default());
        let url = client.endpoint(&request()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://opentdb.com/api.php?amount=5&category=21&difficulty=hard"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = OpenTriviaClient::new(OpenTriviaConfig {
            base_url: "http://localhost:8080/".into(),
        });
        let url = client.endpoint(&request()).unwrap();
        assert_eq!(url.path(), "/api.php");
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn endpoint_rejects_garbage_base_url() {
        let client = OpenTriviaClient::new(OpenTriviaConfig {
            base_url: "not a url".into(),
        });
        assert!(matches!(
            client.endpoint(&request()),
            Err(SourceError::Url(_))
        ));
    }
}
