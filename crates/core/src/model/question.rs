use serde::Serialize;

use crate::model::ids::QuestionId;

/// Decoded question content before answer choices are arranged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub prompt: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub category: String,
    pub difficulty: String,
    pub kind: String,
}

/// A question as presented during a session.
///
/// `answer_choices` holds the correct answer plus every distractor. Their order is
/// decided once in [`Question::new`] and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    correct_answer: String,
    category: String,
    difficulty: String,
    kind: String,
    answer_choices: Vec<String>,
}

impl Question {
    /// Build a question, letting `arrange` order the answer choices exactly once.
    ///
    /// `arrange` receives the correct answer followed by the distractors and may
    /// permute them in place (typically a shuffle).
    #[must_use]
    pub fn new(id: QuestionId, draft: QuestionDraft, arrange: impl FnOnce(&mut [String])) -> Self {
        let QuestionDraft {
            prompt,
            correct_answer,
            incorrect_answers,
            category,
            difficulty,
            kind,
        } = draft;

        let mut answer_choices = Vec::with_capacity(incorrect_answers.len() + 1);
        answer_choices.push(correct_answer.clone());
        answer_choices.extend(incorrect_answers);
        arrange(&mut answer_choices);

        Self {
            id,
            prompt,
            correct_answer,
            category,
            difficulty,
            kind,
            answer_choices,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    /// Question type as reported by the source (`multiple`, `boolean`).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn answer_choices(&self) -> &[String] {
        &self.answer_choices
    }

    #[must_use]
    pub fn has_choice(&self, answer: &str) -> bool {
        self.answer_choices.iter().any(|choice| choice == answer)
    }

    /// Exact, case-sensitive comparison against the decoded correct answer.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}
