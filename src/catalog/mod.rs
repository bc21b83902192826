//! Question catalog — immutable, ordered phases and questions.
//!
//! The catalog is pure data: display labels, canonical value maps, and
//! conditional-visibility rules are all declarative. Integrity (unique
//! ids, no forward condition references) is checked once at construction
//! and never again at runtime.

mod defaults;

pub use defaults::default_catalog;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::answers::AnswerStore;
use crate::error::CatalogError;

/// What kind of input a question accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Free-form numeric input, kept as a string until transform.
    Number,
    /// Single choice, all options visible.
    Radio,
    /// Single choice from a dropdown.
    Select,
    /// Multiple choice, selection order preserved.
    Checkbox,
}

impl QuestionKind {
    /// Whether the kind requires a non-empty `options` list.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Radio | Self::Select | Self::Checkbox)
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Number => "number",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
        };
        write!(f, "{s}")
    }
}

/// Declarative visibility rule for a conditional question.
///
/// Conditions are data, not closures, so the catalog can validate that
/// they only look backward and tests can enumerate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Applicable when the referenced question's answer is one of `labels`.
    /// An unanswered reference does not match.
    AnswerIn {
        question: String,
        labels: Vec<String>,
    },
    /// Applicable unless the referenced question's answer is one of `labels`.
    /// An unanswered reference matches (the question stays visible).
    AnswerNotIn {
        question: String,
        labels: Vec<String>,
    },
}

impl Condition {
    /// The question id this condition reads.
    pub fn referenced_question(&self) -> &str {
        match self {
            Self::AnswerIn { question, .. } | Self::AnswerNotIn { question, .. } => question,
        }
    }

    /// Evaluate against the current answers.
    pub fn evaluate(&self, answers: &AnswerStore) -> bool {
        match self {
            Self::AnswerIn { question, labels } => answers
                .choice(question)
                .map(|label| labels.iter().any(|l| l == label))
                .unwrap_or(false),
            Self::AnswerNotIn { question, labels } => answers
                .choice(question)
                .map(|label| !labels.iter().any(|l| l == label))
                .unwrap_or(true),
        }
    }
}

/// Inclusive numeric bounds for `number` questions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericBounds {
    pub min: f64,
    pub max: f64,
}

impl NumericBounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A single question in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Globally unique identifier, e.g. `"exercise_frequency"`.
    pub id: String,
    /// Display prompt shown to the user.
    pub text: String,
    pub kind: QuestionKind,
    /// Ordered display labels for choice kinds; empty for `number`.
    #[serde(default)]
    pub options: Vec<String>,
    /// Display label → canonical wire value. Labels without an entry pass
    /// through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_map: Option<BTreeMap<String, String>>,
    /// Numeric bounds for `number` questions (advisory or enforced,
    /// depending on engine policy).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<NumericBounds>,
    /// Visibility rule; absent means always applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Question {
    /// Whether this question currently applies, given the answers so far.
    pub fn is_applicable(&self, answers: &AnswerStore) -> bool {
        self.condition
            .as_ref()
            .map(|c| c.evaluate(answers))
            .unwrap_or(true)
    }

    /// Canonicalize a display label through the value map, if any.
    pub fn map_label<'a>(&'a self, label: &'a str) -> &'a str {
        self.value_map
            .as_ref()
            .and_then(|m| m.get(label))
            .map(String::as_str)
            .unwrap_or(label)
    }
}

/// An ordered group of related questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    pub title: String,
    pub questions: Vec<Question>,
}

/// The full questionnaire: ordered phases, validated at construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    phases: Vec<Phase>,
}

impl Catalog {
    /// Build a catalog, failing fast on integrity violations:
    /// duplicate ids, choice questions without options, value maps over
    /// unknown labels, and conditions referencing non-earlier questions.
    pub fn new(phases: Vec<Phase>) -> Result<Self, CatalogError> {
        if phases.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen: Vec<&str> = Vec::new();

        for phase in &phases {
            if phase.questions.is_empty() {
                return Err(CatalogError::EmptyPhase {
                    phase: phase.title.clone(),
                });
            }
            for question in &phase.questions {
                if seen.contains(&question.id.as_str()) {
                    return Err(CatalogError::DuplicateId(question.id.clone()));
                }
                if question.kind.is_choice() && question.options.is_empty() {
                    return Err(CatalogError::MissingOptions {
                        question: question.id.clone(),
                    });
                }
                if let Some(map) = &question.value_map {
                    for label in map.keys() {
                        if question.kind.is_choice() && !question.options.contains(label) {
                            return Err(CatalogError::UnknownMapLabel {
                                question: question.id.clone(),
                                label: label.clone(),
                            });
                        }
                    }
                }
                if let Some(condition) = &question.condition {
                    let referenced = condition.referenced_question();
                    if !seen.contains(&referenced) {
                        return Err(CatalogError::ForwardReference {
                            question: question.id.clone(),
                            referenced: referenced.to_string(),
                        });
                    }
                }
                seen.push(&question.id);
            }
        }

        Ok(Self { phases })
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Total number of questions across all phases.
    pub fn question_count(&self) -> usize {
        self.phases.iter().map(|p| p.questions.len()).sum()
    }

    /// Look up a question by its `(phase, question)` position.
    pub fn question_at(&self, phase: usize, question: usize) -> Option<&Question> {
        self.phases.get(phase)?.questions.get(question)
    }

    /// Look up a question by id.
    pub fn question_by_id(&self, id: &str) -> Option<&Question> {
        self.phases
            .iter()
            .flat_map(|p| &p.questions)
            .find(|q| q.id == id)
    }
}
