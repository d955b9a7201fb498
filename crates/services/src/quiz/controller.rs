use std::fmt;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::Clock;
use quiz_core::model::{
    ConfigUpdate, Question, QuizConfig, QuizResults, SessionPhase, Selections,
};

use super::builder::QuestionSetBuilder;
use super::snapshot::{QuestionView, QuizProgress, SessionSnapshot};
use crate::error::{QuizError, SourceError};
use crate::source::{QuestionRequest, QuestionSource, SourceResponse};

const FETCH_FAILED: &str = "Failed to fetch quiz data. Please try a different settings.";

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owns one quiz session: configuration, loaded questions, answers and results.
///
/// Every mutation goes through a phase guard; an operation invoked in the wrong
/// phase returns `QuizError::InvalidState` and leaves the state untouched.
pub struct QuizController {
    clock: Clock,
    rng: StdRng,
    config: QuizConfig,
    phase: SessionPhase,
    questions: Vec<Question>,
    current: usize,
    selections: Selections,
    results: Option<QuizResults>,
    last_error: Option<String>,
    started_at: Option<DateTime<Utc>>,
}

impl QuizController {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            rng: StdRng::from_os_rng(),
            config: QuizConfig::default(),
            phase: SessionPhase::Configuring,
            questions: Vec::new(),
            current: 0,
            selections: Selections::new(),
            results: None,
            last_error: None,
            started_at: None,
        }
    }

    /// Use a seeded generator for answer shuffling (deterministic tests).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == SessionPhase::Active {
            self.questions.get(self.current)
        } else {
            None
        }
    }

    #[must_use]
    pub fn selected_answers(&self) -> &Selections {
        &self.selections
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn results(&self) -> Option<&QuizResults> {
        self.results.as_ref()
    }

    /// Final score, present only once the session reached `Results`.
    #[must_use]
    pub fn final_score_percent(&self) -> Option<f64> {
        self.results.as_ref().map(QuizResults::score_percent)
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.questions.len(),
            answered: self.selections.len(),
            current: self.current,
        }
    }

    //
    // ─── CONFIGURATION ─────────────────────────────────────────────────────────
    //

    /// Apply a partial configuration change.
    ///
    /// The question count is clamped into range; category and difficulty are validated.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` outside `Configuring`/`Error`.
    /// Returns `QuizError::InvalidConfiguration` for an unknown category or difficulty.
    pub fn update_configuration(&mut self, update: &ConfigUpdate) -> Result<&QuizConfig, QuizError> {
        self.ensure_phase(
            "update configuration",
            &[SessionPhase::Configuring, SessionPhase::Error],
        )?;
        if update.is_empty() {
            return Ok(&self.config);
        }
        self.config = self.config.apply(update)?;
        tracing::debug!(config = ?self.config, "configuration updated");
        Ok(&self.config)
    }

    //
    // ─── LOADING ───────────────────────────────────────────────────────────────
    //

    /// Run the whole load: enter `Loading`, make one request, resolve it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless in `Configuring` or `Error`.
    /// Returns `QuizError::InsufficientQuestions` or `QuizError::Transport` when the
    /// load fails; the session is then in `Error` with the message retained.
    pub async fn start_quiz(&mut self, source: &dyn QuestionSource) -> Result<(), QuizError> {
        let request = self.begin_start()?;
        let outcome = source.fetch(&request).await;
        self.complete_start(outcome)
    }

    /// Enter `Loading` and return the request to send.
    ///
    /// Hosts that render the `Loading` phase drive the fetch themselves and hand the
    /// outcome to [`Self::complete_start`].
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless in `Configuring` or `Error`.
    pub fn begin_start(&mut self) -> Result<QuestionRequest, QuizError> {
        self.ensure_phase("start quiz", &[SessionPhase::Configuring, SessionPhase::Error])?;

        self.clear_session();
        self.last_error = None;
        self.phase = SessionPhase::Loading;

        let request = QuestionRequest::from(&self.config);
        tracing::info!(
            amount = request.amount,
            category = %request.category,
            difficulty = %request.difficulty,
            "loading questions"
        );
        Ok(request)
    }

    /// Resolve a pending load with the source outcome.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` if no load is pending (for example after a
    /// `reset`); the outcome is discarded.
    /// Returns `QuizError::InsufficientQuestions` or `QuizError::Transport` when the
    /// outcome is a failure.
    pub fn complete_start(
        &mut self,
        outcome: Result<SourceResponse, SourceError>,
    ) -> Result<(), QuizError> {
        self.ensure_phase("finish loading", &[SessionPhase::Loading])?;

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "question source unreachable");
                let message = err.to_string();
                return Err(self.fail(QuizError::Transport { message }));
            }
        };

        let requested = usize::try_from(self.config.question_count()).unwrap_or(usize::MAX);
        if !response.is_success() {
            let reason = SourceResponse::describe_code(response.response_code);
            tracing::warn!(code = response.response_code, reason, "question source refused request");
            let message = format!("{FETCH_FAILED} ({reason})");
            return Err(self.fail(QuizError::InsufficientQuestions { message }));
        }
        if response.results.len() < requested {
            let received = response.results.len();
            tracing::warn!(received, requested, "question source returned a short set");
            let message = format!("{FETCH_FAILED} (received {received} of {requested} questions)");
            return Err(self.fail(QuizError::InsufficientQuestions { message }));
        }

        let questions = QuestionSetBuilder::new(&mut self.rng)
            .build(response.results.into_iter().take(requested));
        self.questions = questions;
        self.current = 0;
        self.selections.clear();
        self.started_at = Some(self.clock.now());
        self.phase = SessionPhase::Active;
        tracing::info!(questions = self.questions.len(), "quiz started");
        Ok(())
    }

    fn fail(&mut self, err: QuizError) -> QuizError {
        self.phase = SessionPhase::Error;
        self.last_error = Some(err.to_string());
        err
    }

    //
    // ─── ACTIVE SESSION ────────────────────────────────────────────────────────
    //

    /// Record `answer` for the current question, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` outside `Active`.
    /// Returns `QuizError::UnknownAnswer` if `answer` is not one of the question's choices.
    pub fn select_answer(&mut self, answer: &str) -> Result<(), QuizError> {
        self.ensure_phase("select an answer", &[SessionPhase::Active])?;
        let question = self
            .questions
            .get(self.current)
            .ok_or(QuizError::InvalidState {
                operation: "select an answer",
                phase: self.phase,
            })?;
        if !question.has_choice(answer) {
            return Err(QuizError::UnknownAnswer(answer.to_owned()));
        }

        tracing::debug!(index = self.current, answer, "answer selected");
        self.selections.insert(self.current, answer.to_owned());
        Ok(())
    }

    /// Step back one question. No-op on the first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` outside `Active`.
    pub fn go_to_previous(&mut self) -> Result<usize, QuizError> {
        self.ensure_phase("navigate", &[SessionPhase::Active])?;
        if self.current > 0 {
            self.current -= 1;
            tracing::debug!(index = self.current, "moved to previous question");
        }
        Ok(self.current)
    }

    /// Step forward one question. No-op on the last question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` outside `Active`.
    pub fn go_to_next(&mut self) -> Result<usize, QuizError> {
        self.ensure_phase("navigate", &[SessionPhase::Active])?;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            tracing::debug!(index = self.current, "moved to next question");
        }
        Ok(self.current)
    }

    /// Score the session and move to `Results`.
    ///
    /// Unanswered questions score zero and do not block submission.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` outside `Active`.
    pub fn submit_quiz(&mut self) -> Result<&QuizResults, QuizError> {
        self.ensure_phase("submit", &[SessionPhase::Active])?;

        let submitted_at = self.clock.now();
        let started_at = self.started_at.unwrap_or(submitted_at);
        let results = QuizResults::grade(&self.questions, &self.selections, started_at, submitted_at);
        tracing::info!(
            score = results.score_percent(),
            correct = results.correct(),
            total = results.total(),
            "quiz submitted"
        );

        self.phase = SessionPhase::Results;
        Ok(self.results.insert(results))
    }

    //
    // ─── RECOVERY ──────────────────────────────────────────────────────────────
    //

    /// Discard everything and return to `Configuring` with default settings.
    pub fn reset(&mut self) {
        tracing::info!(from = %self.phase, "session reset");
        self.clear_session();
        self.config = QuizConfig::default();
        self.last_error = None;
        self.phase = SessionPhase::Configuring;
    }

    /// Leave `Error` for `Configuring`, keeping the current configuration.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` outside `Error`.
    pub fn dismiss_error(&mut self) -> Result<(), QuizError> {
        self.ensure_phase("dismiss an error", &[SessionPhase::Error])?;
        self.last_error = None;
        self.phase = SessionPhase::Configuring;
        Ok(())
    }

    //
    // ─── VIEW ──────────────────────────────────────────────────────────────────
    //

    /// Read-only copy of the state for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let active = self.phase == SessionPhase::Active;
        let total = self.questions.len();
        let question = self.current_question().map(|question| QuestionView {
            index: self.current,
            total,
            prompt: question.prompt().to_owned(),
            category: question.category().to_owned(),
            difficulty: question.difficulty().to_owned(),
            choices: question.answer_choices().to_vec(),
            selected: self.selections.get(&self.current).cloned(),
        });

        SessionSnapshot {
            phase: self.phase,
            config: self.config,
            question,
            progress: active.then(|| self.progress()),
            has_previous: active && self.current > 0,
            has_next: active && self.current + 1 < total,
            can_submit: active && self.current + 1 == total,
            last_error: self.last_error.clone(),
            results: self.results.clone(),
        }
    }

    fn ensure_phase(
        &self,
        operation: &'static str,
        allowed: &[SessionPhase],
    ) -> Result<(), QuizError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(QuizError::InvalidState {
                operation,
                phase: self.phase,
            })
        }
    }

    fn clear_session(&mut self) {
        self.questions.clear();
        self.current = 0;
        self.selections.clear();
        self.results = None;
        self.started_at = None;
    }
}

impl Default for QuizController {
    fn default() -> Self {
        Self::new(Clock::system())
    }
}

impl fmt::Debug for QuizController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizController")
            .field("phase", &self.phase)
            .field("config", &self.config)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.selections.len())
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawQuestion;
    use quiz_core::model::{CategoryId, Difficulty};
    use quiz_core::time::{fixed_clock, fixed_now};

    fn raw(index: usize) -> RawQuestion {
        RawQuestion {
            kind: "multiple".into(),
            difficulty: "medium".into(),
            category: "Science: Computers".into(),
            question: format!("Question {index}?"),
            correct_answer: format!("right {index}"),
            incorrect_answers: vec![format!("wrong {index}"), "B".into(), "A".into()],
        }
    }

    fn response(count: usize) -> SourceResponse {
        SourceResponse::success((0..count).map(raw).collect())
    }

    fn active(count: usize) -> QuizController {
        let mut quiz = QuizController::new(fixed_clock()).with_seed(11);
        let count_i64 = i64::try_from(count).unwrap();
        quiz.update_configuration(&ConfigUpdate::new().question_count(count_i64))
            .unwrap();
        quiz.begin_start().unwrap();
        quiz.complete_start(Ok(response(count))).unwrap();
        quiz
    }

    #[test]
    fn starts_configuring_with_defaults() {
        let quiz = QuizController::new(fixed_clock());
        assert_eq!(quiz.phase(), SessionPhase::Configuring);
        assert_eq!(*quiz.config(), QuizConfig::default());
        assert!(quiz.questions().is_empty());
        assert_eq!(quiz.final_score_percent(), None);
    }

    #[test]
    fn configuration_clamps_count() {
        let mut quiz = QuizController::new(fixed_clock());
        let config = quiz
            .update_configuration(&ConfigUpdate::new().question_count(0))
            .unwrap();
        assert_eq!(config.question_count(), 1);
        let config = quiz
            .update_configuration(&ConfigUpdate::new().question_count(999))
            .unwrap();
        assert_eq!(config.question_count(), 50);
    }

    #[test]
    fn invalid_configuration_leaves_state_unchanged() {
        let mut quiz = QuizController::new(fixed_clock());
        let err = quiz
            .update_configuration(
                &ConfigUpdate::new()
                    .question_count(5)
                    .category(CategoryId::new(1)),
            )
            .unwrap_err();
        assert!(matches!(err, QuizError::InvalidConfiguration(_)));
        assert_eq!(*quiz.config(), QuizConfig::default());

        let err = quiz
            .update_configuration(&ConfigUpdate::new().difficulty("nightmare"))
            .unwrap_err();
        assert!(matches!(err, QuizError::InvalidConfiguration(_)));
        assert_eq!(quiz.config().difficulty(), Difficulty::Medium);
    }

    #[test]
    fn loading_rejects_other_operations() {
        let mut quiz = QuizController::new(fixed_clock());
        let request = quiz.begin_start().unwrap();
        assert_eq!(request.amount, 10);
        assert_eq!(quiz.phase(), SessionPhase::Loading);

        assert!(matches!(
            quiz.update_configuration(&ConfigUpdate::new().question_count(3)),
            Err(QuizError::InvalidState { phase: SessionPhase::Loading, .. })
        ));
        assert!(matches!(
            quiz.go_to_next(),
            Err(QuizError::InvalidState { .. })
        ));
        assert!(matches!(
            quiz.begin_start(),
            Err(QuizError::InvalidState { .. })
        ));
        assert_eq!(quiz.phase(), SessionPhase::Loading);
    }

    #[test]
    fn successful_load_activates_session() {
        let quiz = active(4);
        assert_eq!(quiz.phase(), SessionPhase::Active);
        assert_eq!(quiz.questions().len(), 4);
        assert_eq!(quiz.current_index(), 0);
        assert!(quiz.selected_answers().is_empty());
        assert_eq!(quiz.current_question().unwrap().prompt(), "Question 0?");
    }

    #[test]
    fn refused_request_moves_to_error() {
        let mut quiz = QuizController::new(fixed_clock());
        quiz.begin_start().unwrap();
        let err = quiz
            .complete_start(Ok(SourceResponse {
                response_code: 1,
                results: Vec::new(),
            }))
            .unwrap_err();

        assert!(matches!(err, QuizError::InsufficientQuestions { .. }));
        assert_eq!(quiz.phase(), SessionPhase::Error);
        let message = quiz.last_error().unwrap();
        assert!(message.starts_with("Failed to fetch quiz data."));
        assert!(message.contains("not enough questions"));
    }

    #[test]
    fn short_result_set_is_insufficient() {
        let mut quiz = QuizController::new(fixed_clock());
        quiz.update_configuration(&ConfigUpdate::new().question_count(5))
            .unwrap();
        quiz.begin_start().unwrap();
        let err = quiz.complete_start(Ok(response(3))).unwrap_err();
        assert!(matches!(err, QuizError::InsufficientQuestions { .. }));
        assert!(quiz.last_error().unwrap().contains("received 3 of 5"));
        assert!(quiz.questions().is_empty());
    }

    #[test]
    fn late_outcome_after_reset_is_ignored() {
        let mut quiz = QuizController::new(fixed_clock());
        quiz.begin_start().unwrap();
        quiz.reset();
        let err = quiz.complete_start(Ok(response(10))).unwrap_err();
        assert!(matches!(err, QuizError::InvalidState { .. }));
        assert_eq!(quiz.phase(), SessionPhase::Configuring);
        assert!(quiz.questions().is_empty());
    }

    #[test]
    fn navigation_is_bounded() {
        let mut quiz = active(3);
        assert_eq!(quiz.go_to_previous().unwrap(), 0);
        assert_eq!(quiz.go_to_next().unwrap(), 1);
        assert_eq!(quiz.go_to_next().unwrap(), 2);
        assert_eq!(quiz.go_to_next().unwrap(), 2);
        assert_eq!(quiz.go_to_previous().unwrap(), 1);
    }

    #[test]
    fn selection_overwrites_previous_choice() {
        let mut quiz = active(2);
        quiz.select_answer("A").unwrap();
        quiz.select_answer("B").unwrap();
        assert_eq!(quiz.selected_answers().len(), 1);
        assert_eq!(quiz.selected_answers().get(&0).map(String::as_str), Some("B"));

        quiz.select_answer("B").unwrap();
        assert_eq!(quiz.selected_answers().len(), 1);
    }

    #[test]
    fn selection_outside_choices_is_rejected() {
        let mut quiz = active(2);
        let err = quiz.select_answer("Z").unwrap_err();
        assert_eq!(err, QuizError::UnknownAnswer("Z".into()));
        assert!(quiz.selected_answers().is_empty());
    }

    #[test]
    fn selection_requires_active_session() {
        let mut quiz = QuizController::new(fixed_clock());
        let err = quiz.select_answer("A").unwrap_err();
        assert_eq!(
            err,
            QuizError::InvalidState {
                operation: "select an answer",
                phase: SessionPhase::Configuring,
            }
        );
        assert!(quiz.selected_answers().is_empty());
        assert_eq!(quiz.phase(), SessionPhase::Configuring);
    }

    #[test]
    fn submit_scores_exact_matches() {
        let mut quiz = active(4);
        quiz.select_answer("right 0").unwrap();
        quiz.go_to_next().unwrap();
        quiz.select_answer("A").unwrap();
        quiz.go_to_next().unwrap();
        quiz.select_answer("right 2").unwrap();

        let results = quiz.submit_quiz().unwrap();
        assert!((results.score_percent() - 50.0).abs() < f64::EPSILON);
        assert_eq!(results.submitted_at(), fixed_now());
        assert_eq!(quiz.phase(), SessionPhase::Results);
        assert_eq!(quiz.final_score_percent(), Some(50.0));
    }

    #[test]
    fn submit_without_answers_scores_zero() {
        let mut quiz = active(3);
        let results = quiz.submit_quiz().unwrap();
        assert_eq!(results.score_percent(), 0.0);
        assert_eq!(results.unanswered(), 3);
    }

    #[test]
    fn results_phase_is_terminal_until_reset() {
        let mut quiz = active(2);
        quiz.submit_quiz().unwrap();
        assert!(quiz.go_to_previous().is_err());
        assert!(quiz.select_answer("A").is_err());
        assert!(quiz.submit_quiz().is_err());
        assert!(quiz.begin_start().is_err());
        assert!(quiz.dismiss_error().is_err());
    }

    #[test]
    fn reset_from_results_restores_defaults() {
        let mut quiz = QuizController::new(fixed_clock()).with_seed(3);
        quiz.update_configuration(
            &ConfigUpdate::new().question_count(2).difficulty("hard"),
        )
        .unwrap();
        quiz.begin_start().unwrap();
        quiz.complete_start(Ok(response(2))).unwrap();
        quiz.select_answer("A").unwrap();
        quiz.submit_quiz().unwrap();

        quiz.reset();

        assert_eq!(quiz.phase(), SessionPhase::Configuring);
        assert_eq!(*quiz.config(), QuizConfig::default());
        assert!(quiz.questions().is_empty());
        assert!(quiz.selected_answers().is_empty());
        assert!(quiz.results().is_none());
        assert_eq!(quiz.current_index(), 0);
    }

    #[test]
    fn dismiss_error_keeps_configuration() {
        let mut quiz = QuizController::new(fixed_clock());
        quiz.update_configuration(&ConfigUpdate::new().question_count(7))
            .unwrap();
        quiz.begin_start().unwrap();
        let _ = quiz.complete_start(Ok(SourceResponse {
            response_code: 5,
            results: Vec::new(),
        }));

        quiz.update_configuration(&ConfigUpdate::new().difficulty("easy"))
            .unwrap();
        assert_eq!(quiz.phase(), SessionPhase::Error);

        quiz.dismiss_error().unwrap();
        assert_eq!(quiz.phase(), SessionPhase::Configuring);
        assert_eq!(quiz.last_error(), None);
        assert_eq!(quiz.config().question_count(), 7);
        assert_eq!(quiz.config().difficulty(), Difficulty::Easy);
    }

    #[test]
    fn snapshot_exposes_navigation_flags() {
        let mut quiz = active(2);
        let first = quiz.snapshot();
        assert!(!first.has_previous);
        assert!(first.has_next);
        assert!(!first.can_submit);
        let view = first.question.unwrap();
        assert_eq!(view.position_label(), "1/2");
        assert_eq!(first.progress.unwrap().total, 2);

        quiz.go_to_next().unwrap();
        let last = quiz.snapshot();
        assert!(last.has_previous);
        assert!(!last.has_next);
        assert!(last.can_submit);
    }

    #[test]
    fn answer_order_is_stable_across_snapshots() {
        let mut quiz = active(3);
        let before = quiz.snapshot().question.unwrap().choices;
        quiz.go_to_next().unwrap();
        quiz.go_to_previous().unwrap();
        let after = quiz.snapshot().question.unwrap().choices;
        assert_eq!(before, after);
        assert_eq!(quiz.questions()[0].answer_choices(), before.as_slice());
    }

    #[test]
    fn snapshot_outside_active_has_no_question() {
        let quiz = QuizController::new(fixed_clock());
        let snapshot = quiz.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Configuring);
        assert!(snapshot.question.is_none());
        assert!(snapshot.progress.is_none());
        assert!(!snapshot.can_submit);
    }

    #[test]
    fn empty_update_keeps_configuration_but_checks_phase() {
        let mut quiz = QuizController::new(fixed_clock());
        quiz.update_configuration(&ConfigUpdate::new().question_count(3))
            .unwrap();
        let config = *quiz.update_configuration(&ConfigUpdate::new()).unwrap();
        assert_eq!(config.question_count(), 3);

        let mut quiz = active(2);
        let err = quiz.update_configuration(&ConfigUpdate::new()).unwrap_err();
        assert!(matches!(err, QuizError::InvalidState { .. }));
    }
}
