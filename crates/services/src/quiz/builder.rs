use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, QuestionDraft, QuestionId};
use quiz_core::text::decode_entities;

use crate::source::RawQuestion;

/// Turns raw source records into session questions.
///
/// Text fields are entity-decoded and each question's answer choices are shuffled
/// once, here, so the order stays fixed for the rest of the session.
pub struct QuestionSetBuilder<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> QuestionSetBuilder<'a, R> {
    #[must_use]
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }

    pub fn build(self, raw: impl IntoIterator<Item = RawQuestion>) -> Vec<Question> {
        let rng = self.rng;
        let mut questions = Vec::new();
        for (index, item) in raw.into_iter().enumerate() {
            let draft = decode_draft(item);
            let question = Question::new(QuestionId::new(index), draft, |choices| {
                choices.shuffle(&mut *rng);
            });
            questions.push(question);
        }
        questions
    }
}

fn decode_draft(raw: RawQuestion) -> QuestionDraft {
    QuestionDraft {
        prompt: decode_entities(&raw.question),
        correct_answer: decode_entities(&raw.correct_answer),
        incorrect_answers: raw
            .incorrect_answers
            .iter()
            .map(|answer| decode_entities(answer))
            .collect(),
        category: decode_entities(&raw.category),
        difficulty: raw.difficulty,
        kind: raw.kind,
    }
}
