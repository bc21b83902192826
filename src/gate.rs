//! Advancement gate — decides whether the flow may move past a question.
//!
//! Pure and deterministic: same catalog, answers, and policy always give
//! the same verdict. A refusal is a plain `false`, surfaced by the UI as a
//! disabled advance control, never an error.

use crate::answers::{Answer, AnswerStore};
use crate::catalog::{Question, QuestionKind};
use crate::config::BoundsPolicy;

/// Whether the flow may advance past `question` given the answers so far.
///
/// A question whose condition evaluates false is moot and never blocks.
pub fn can_advance(question: &Question, answers: &AnswerStore, policy: BoundsPolicy) -> bool {
    if !question.is_applicable(answers) {
        return true;
    }

    let Some(answer) = answers.get(&question.id) else {
        return false;
    };
    if answer.is_empty() {
        return false;
    }

    match question.kind {
        QuestionKind::Number => match policy {
            BoundsPolicy::Advisory => true,
            BoundsPolicy::Enforce => number_in_bounds(question, answer),
        },
        QuestionKind::Radio | QuestionKind::Select => match answer {
            Answer::Choice(label) => question.options.iter().any(|o| o == label),
            _ => false,
        },
        QuestionKind::Checkbox => matches!(answer, Answer::Multi(labels) if !labels.is_empty()),
    }
}

/// Whether a numeric answer parses and falls within the question's bounds.
///
/// Under the advisory policy this is display guidance only; under the
/// enforce policy it becomes part of the gate.
pub fn number_in_bounds(question: &Question, answer: &Answer) -> bool {
    let Answer::Number(raw) = answer else {
        return false;
    };
    let Ok(value) = raw.trim().parse::<f64>() else {
        return false;
    };
    question
        .bounds
        .map(|b| b.contains(value))
        .unwrap_or(true)
}
