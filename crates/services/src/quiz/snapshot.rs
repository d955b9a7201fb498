use serde::Serialize;

use quiz_core::model::{QuizConfig, QuizResults, SessionPhase};

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    /// 0-based index of the question on screen.
    pub current: usize,
}

/// The question currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub category: String,
    pub difficulty: String,
    pub choices: Vec<String>,
    pub selected: Option<String>,
}

impl QuestionView {
    /// 1-based position label, e.g. `"3/10"`.
    #[must_use]
    pub fn position_label(&self) -> String {
        format!("{}/{}", self.index + 1, self.total)
    }
}

/// Read-only copy of the session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub config: QuizConfig,
    pub question: Option<QuestionView>,
    pub progress: Option<QuizProgress>,
    pub has_previous: bool,
    pub has_next: bool,
    /// Submission is offered on the last question only.
    pub can_submit: bool,
    pub last_error: Option<String>,
    pub results: Option<QuizResults>,
}
