mod builder;
mod controller;
mod intent;
mod snapshot;

// Public API of the quiz session subsystem.
pub use crate::error::QuizError;
pub use builder::QuestionSetBuilder;
pub use controller::QuizController;
pub use intent::{Direction, QuizIntent};
pub use snapshot::{QuestionView, QuizProgress, SessionSnapshot};
