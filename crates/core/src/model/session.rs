use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

/// Selected answer text keyed by question index. Only answered questions have an entry.
pub type Selections = BTreeMap<usize, String>;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Discrete stage of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SessionPhase {
    /// Collecting quiz parameters. Initial state.
    #[default]
    Configuring,
    /// Waiting on the question source.
    Loading,
    /// Questions loaded; navigation and answering allowed.
    Active,
    /// The last load failed; the message is kept for display.
    Error,
    /// Submitted and scored. Ends the session until reset.
    Results,
}

impl SessionPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Configuring => "configuring",
            SessionPhase::Loading => "loading",
            SessionPhase::Active => "active",
            SessionPhase::Error => "error",
            SessionPhase::Results => "results",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Per-question line of the results review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerReview {
    pub question_id: QuestionId,
    pub prompt: String,
    pub selected: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Scored outcome of a submitted session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizResults {
    score_percent: f64,
    correct: usize,
    total: usize,
    reviews: Vec<AnswerReview>,
    started_at: DateTime<Utc>,
    submitted_at: DateTime<Utc>,
}

impl QuizResults {
    /// Score every question against the selections.
    ///
    /// A question earns `100 / total` points only when its selection equals the
    /// correct answer exactly; unanswered questions earn nothing.
    #[must_use]
    pub fn grade(
        questions: &[Question],
        selections: &Selections,
        started_at: DateTime<Utc>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let reviews: Vec<AnswerReview> = questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = selections.get(&index).cloned();
                let is_correct = selected
                    .as_deref()
                    .is_some_and(|answer| question.is_correct(answer));
                AnswerReview {
                    question_id: question.id(),
                    prompt: question.prompt().to_owned(),
                    selected,
                    correct_answer: question.correct_answer().to_owned(),
                    is_correct,
                }
            })
            .collect();

        let correct = reviews.iter().filter(|review| review.is_correct).count();
        let total = reviews.len();

        Self {
            score_percent: score_percent(correct, total),
            correct,
            total,
            reviews,
            started_at,
            submitted_at,
        }
    }

    #[must_use]
    pub fn score_percent(&self) -> f64 {
        self.score_percent
    }

    /// Score rendered with two decimals, e.g. `"66.67%"`.
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("{:.2}%", self.score_percent)
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.reviews
            .iter()
            .filter(|review| review.selected.is_none())
            .count()
    }

    #[must_use]
    pub fn reviews(&self) -> &[AnswerReview] {
        &self.reviews
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

#[allow(clippy::cast_precision_loss)]
fn score_percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 * 100.0 / total as f64
}
