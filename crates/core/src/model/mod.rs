pub mod category;
mod config;
mod ids;
mod question;
mod session;

pub use category::{Category, CategoryError, DEFAULT_CATEGORY_ID};
pub use config::{ConfigError, ConfigUpdate, Difficulty, QuizConfig};
pub use ids::{CategoryId, ParseIdError, QuestionId};
pub use question::{Question, QuestionDraft};
pub use session::{AnswerReview, QuizResults, SessionPhase, Selections};
