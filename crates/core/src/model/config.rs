use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::category;
use crate::model::ids::CategoryId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("unknown category id: {0}")]
    UnknownCategory(CategoryId),

    #[error("unknown difficulty: {0:?} (expected easy, medium or hard)")]
    UnknownDifficulty(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Wire value understood by the question source.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_owned())),
        }
    }
}

//
// ─── CONFIGURATION ─────────────────────────────────────────────────────────────
//

/// Parameters used to request a question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    question_count: u32,
    category: CategoryId,
    difficulty: Difficulty,
}

impl QuizConfig {
    pub const MIN_QUESTIONS: u32 = 1;
    pub const MAX_QUESTIONS: u32 = 50;
    pub const DEFAULT_QUESTIONS: u32 = 10;

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn category(&self) -> CategoryId {
        self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Clamp any requested count into `[MIN_QUESTIONS, MAX_QUESTIONS]`.
    #[must_use]
    pub fn clamp_count(requested: i64) -> u32 {
        let clamped = requested.clamp(
            i64::from(Self::MIN_QUESTIONS),
            i64::from(Self::MAX_QUESTIONS),
        );
        u32::try_from(clamped).unwrap_or(Self::DEFAULT_QUESTIONS)
    }

    /// Produce a new configuration with the fields of `update` applied.
    ///
    /// Every field is validated before anything is replaced, so a rejected update
    /// never yields a half-applied configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownCategory` if the category is not in the catalog.
    /// Returns `ConfigError::UnknownDifficulty` if the difficulty string is not recognised.
    pub fn apply(&self, update: &ConfigUpdate) -> Result<Self, ConfigError> {
        let category = match update.category {
            Some(id) => {
                category::lookup(id).map_err(|_| ConfigError::UnknownCategory(id))?;
                id
            }
            None => self.category,
        };
        let difficulty = match update.difficulty.as_deref() {
            Some(raw) => raw.parse::<Difficulty>()?,
            None => self.difficulty,
        };
        let question_count = update
            .question_count
            .map_or(self.question_count, Self::clamp_count);

        Ok(Self {
            question_count,
            category,
            difficulty,
        })
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: Self::DEFAULT_QUESTIONS,
            category: category::default_category().id(),
            difficulty: Difficulty::Medium,
        }
    }
}

/// Partial configuration change coming from the presentation layer.
///
/// Values are kept in their raw form so validation happens in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub question_count: Option<i64>,
    pub category: Option<CategoryId>,
    pub difficulty: Option<String>,
}

impl ConfigUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn question_count(mut self, count: i64) -> Self {
        self.question_count = Some(count);
        self
    }

    #[must_use]
    pub fn category(mut self, id: CategoryId) -> Self {
        self.category = Some(id);
        self
    }

    #[must_use]
    pub fn difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.question_count.is_none() && self.category.is_none() && self.difficulty.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_form() {
        let config = QuizConfig::default();
        assert_eq!(config.question_count(), 10);
        assert_eq!(config.category(), CategoryId::new(18));
        assert_eq!(config.difficulty(), Difficulty::Medium);
    }

    #[test]
    fn count_is_clamped_not_rejected() {
        let base = QuizConfig::default();
        let low = base.apply(&ConfigUpdate::new().question_count(0)).unwrap();
        assert_eq!(low.question_count(), 1);
        let negative = base.apply(&ConfigUpdate::new().question_count(-7)).unwrap();
        assert_eq!(negative.question_count(), 1);
        let high = base.apply(&ConfigUpdate::new().question_count(999)).unwrap();
        assert_eq!(high.question_count(), 50);
        let exact = base.apply(&ConfigUpdate::new().question_count(25)).unwrap();
        assert_eq!(exact.question_count(), 25);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = QuizConfig::default()
            .apply(&ConfigUpdate::new().category(CategoryId::new(99)))
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownCategory(CategoryId::new(99)));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" easy ".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!(matches!(
            "extreme".parse::<Difficulty>(),
            Err(ConfigError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn failed_update_applies_nothing() {
        let base = QuizConfig::default();
        let update = ConfigUpdate::new()
            .question_count(3)
            .category(CategoryId::new(21))
            .difficulty("impossible");
        assert!(base.apply(&update).is_err());
        assert_eq!(base, QuizConfig::default());
    }

    #[test]
    fn update_replaces_only_given_fields() {
        let base = QuizConfig::default();
        let updated = base.apply(&ConfigUpdate::new().difficulty("hard")).unwrap();
        assert_eq!(updated.difficulty(), Difficulty::Hard);
        assert_eq!(updated.question_count(), base.question_count());
        assert_eq!(updated.category(), base.category());
    }
}
