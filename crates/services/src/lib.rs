#![forbid(unsafe_code)]

pub mod error;
pub mod quiz;
pub mod source;

pub use quiz_core::Clock;

pub use error::{QuizError, SourceError};
pub use quiz::{
    Direction, QuestionView, QuizController, QuizIntent, QuizProgress, SessionSnapshot,
};
pub use source::{
    OpenTriviaClient, OpenTriviaConfig, QuestionRequest, QuestionSource, RawQuestion,
    SourceResponse,
};
