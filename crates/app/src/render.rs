use std::fmt::Write as _;

use quiz_core::model::{SessionPhase, category};
use services::SessionSnapshot;

/// Render a snapshot as plain text for the terminal.
#[must_use]
pub fn render(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    match snapshot.phase {
        SessionPhase::Configuring | SessionPhase::Error => render_settings(&mut out, snapshot),
        SessionPhase::Loading => out.push_str("Loading...\n"),
        SessionPhase::Active => render_question(&mut out, snapshot),
        SessionPhase::Results => render_results(&mut out, snapshot),
    }
    out
}

#[must_use]
pub fn render_categories() -> String {
    let mut out = String::new();
    for entry in category::list_all() {
        let _ = writeln!(out, "  {:>2}  {}", entry.id(), entry.name());
    }
    out
}

fn render_settings(out: &mut String, snapshot: &SessionSnapshot) {
    let config = &snapshot.config;
    let category_name = category::lookup(config.category()).map_or("?", |c| c.name());
    let _ = writeln!(out, "Configure Your Quiz");
    let _ = writeln!(out, "  Number of Questions: {}", config.question_count());
    let _ = writeln!(out, "  Category: {} ({})", category_name, config.category());
    let _ = writeln!(out, "  Difficulty: {}", config.difficulty());
    if let Some(err) = &snapshot.last_error {
        let _ = writeln!(out, "! {err}");
    }
    out.push_str("Type `start` to begin.\n");
}

fn render_question(out: &mut String, snapshot: &SessionSnapshot) {
    let Some(question) = &snapshot.question else {
        return;
    };
    let _ = writeln!(
        out,
        "Category: {} | Difficulty: {} | Question: {}",
        question.category,
        question.difficulty,
        question.position_label()
    );
    let _ = writeln!(out, "{}", question.prompt);
    for (index, choice) in question.choices.iter().enumerate() {
        let marker = if question.selected.as_deref() == Some(choice.as_str()) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(out, " {marker}{}. {choice}", index + 1);
    }

    let mut actions = Vec::new();
    if snapshot.has_previous {
        actions.push("prev");
    }
    if snapshot.has_next {
        actions.push("next");
    }
    if snapshot.can_submit {
        actions.push("submit");
    }
    let _ = writeln!(out, "[pick <n>] [{}]", actions.join("] ["));
}

fn render_results(out: &mut String, snapshot: &SessionSnapshot) {
    let Some(results) = &snapshot.results else {
        return;
    };
    let _ = writeln!(out, "Quiz Results");
    let _ = writeln!(out, "Your final score: {}", results.score_label());
    for (index, review) in results.reviews().iter().enumerate() {
        let verdict = if review.is_correct { "correct" } else { "incorrect" };
        let _ = writeln!(out, "Q{}: {} [{verdict}]", index + 1, review.prompt);
        let _ = writeln!(
            out,
            "  Your answer: {}",
            review.selected.as_deref().unwrap_or("Not answered")
        );
        let _ = writeln!(out, "  Correct answer: {}", review.correct_answer);
    }
    out.push_str("Type `reset` to play again.\n");
}
