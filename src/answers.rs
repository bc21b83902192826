//! Raw answer storage — what the user actually picked or typed, keyed by
//! question id. Canonicalization happens later, in `transform`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A raw answer, shaped by the question kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// Numeric input as typed, e.g. `"28"`. Parsed only at transform time.
    Number(String),
    /// The selected display label for `radio`/`select`.
    Choice(String),
    /// Selected display labels for `checkbox`, in selection order,
    /// no duplicates.
    Multi(Vec<String>),
}

impl Answer {
    /// Whether the answer counts as "given" for gating purposes.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Number(s) | Self::Choice(s) => s.trim().is_empty(),
            Self::Multi(labels) => labels.is_empty(),
        }
    }
}

/// Mapping from question id to the user's raw answer.
///
/// Append-only in the sense of the flow: answers are overwritten by later
/// `set_answer` calls but never removed, so a skipped question keeps its
/// stale answer and the transform's applicability rules decide what counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerStore {
    answers: BTreeMap<String, Answer>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, question_id: impl Into<String>, answer: Answer) {
        self.answers.insert(question_id.into(), answer);
    }

    /// Convenience for single-label answers.
    pub fn set_choice(&mut self, question_id: impl Into<String>, label: impl Into<String>) {
        self.set(question_id, Answer::Choice(label.into()));
    }

    /// Convenience for numeric answers.
    pub fn set_number(&mut self, question_id: impl Into<String>, raw: impl Into<String>) {
        self.set(question_id, Answer::Number(raw.into()));
    }

    /// Convenience for multi-select answers. Deduplicates while keeping
    /// first-selection order.
    pub fn set_multi<I, S>(&mut self, question_id: impl Into<String>, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        self.set(question_id, Answer::Multi(seen));
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    /// The single label answered for a question, if it has one.
    pub fn choice(&self, question_id: &str) -> Option<&str> {
        match self.answers.get(question_id)? {
            Answer::Choice(label) | Answer::Number(label) => Some(label.as_str()),
            Answer::Multi(_) => None,
        }
    }

    /// The selected labels for a multi-select question, if answered.
    pub fn multi(&self, question_id: &str) -> Option<&[String]> {
        match self.answers.get(question_id)? {
            Answer::Multi(labels) => Some(labels),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}
