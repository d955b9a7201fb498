use quiz_core::model::{ConfigUpdate, SessionPhase};

use super::controller::QuizController;
use crate::error::QuizError;
use crate::source::QuestionSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// User intents forwarded by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Configure(ConfigUpdate),
    Start,
    Navigate(Direction),
    SelectAnswer(String),
    Submit,
    Reset,
    DismissError,
}

impl QuizController {
    /// Dispatch one intent and report the phase it left the session in.
    ///
    /// # Errors
    ///
    /// Propagates the `QuizError` of the underlying operation.
    pub async fn apply(
        &mut self,
        intent: QuizIntent,
        source: &dyn QuestionSource,
    ) -> Result<SessionPhase, QuizError> {
        match intent {
            QuizIntent::Configure(update) => {
                self.update_configuration(&update)?;
            }
            QuizIntent::Start => self.start_quiz(source).await?,
            QuizIntent::Navigate(Direction::Previous) => {
                self.go_to_previous()?;
            }
            QuizIntent::Navigate(Direction::Next) => {
                self.go_to_next()?;
            }
            QuizIntent::SelectAnswer(answer) => self.select_answer(&answer)?,
            QuizIntent::Submit => {
                self.submit_quiz()?;
            }
            QuizIntent::Reset => self.reset(),
            QuizIntent::DismissError => self.dismiss_error()?,
        }
        Ok(self.phase())
    }
}
