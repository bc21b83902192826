//! Questionnaire flow state machine.
//!
//! `QuizFlow` owns the cursor, the raw answers, and the flow state, and is
//! mutated only through the operations here, so the whole engine is
//! testable without any rendering concerns. All transitions are
//! synchronous; the single async suspension point (the network call)
//! lives in the submission coordinator.
//!
//! Inapplicable questions are skipped with a bounded, synchronous scan in
//! both directions. The cursor therefore always rests on a question whose
//! condition holds against the current answers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answers::{Answer, AnswerStore};
use crate::catalog::{Catalog, Question};
use crate::config::BoundsPolicy;
use crate::error::{FlowError, SubmitError};
use crate::gate;
use crate::submit::Recommendation;

/// Position in the catalog: `(phase index, question index)`, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub phase: usize,
    pub question: usize,
}

/// Where the flow is in its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlowState {
    /// Collecting answers; the cursor is live.
    Active,
    /// One submission is in flight. Mutating operations are rejected.
    Submitting,
    /// Terminal: the recommendation arrived.
    Completed {
        result: Recommendation,
        at: DateTime<Utc>,
    },
    /// The submission failed. Recoverable — cursor and answers are kept
    /// and `submit` may be retried.
    Failed { message: String },
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Submitting => "submitting",
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
        };
        write!(f, "{s}")
    }
}

/// Outcome of a cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cursor moved to another applicable question.
    Moved,
    /// The current question's gate refused; the cursor did not move.
    Blocked,
    /// Already at the last applicable question; ready to submit.
    AtEnd,
    /// Already at the first applicable question; `previous` was a no-op.
    AtStart,
}

/// The questionnaire engine: cursor + answers + flow state.
#[derive(Debug, Clone)]
pub struct QuizFlow {
    catalog: Arc<Catalog>,
    answers: AnswerStore,
    cursor: Cursor,
    state: FlowState,
    bounds_policy: BoundsPolicy,
}

impl QuizFlow {
    /// Start a flow at the first applicable question.
    pub fn new(catalog: Arc<Catalog>, bounds_policy: BoundsPolicy) -> Self {
        let mut flow = Self {
            catalog,
            answers: AnswerStore::new(),
            cursor: Cursor {
                phase: 0,
                question: 0,
            },
            state: FlowState::Active,
            bounds_policy,
        };
        // Leading questions may already be inapplicable.
        if !flow.is_applicable(flow.cursor) {
            if let Some(next) = flow.next_applicable_after(flow.cursor) {
                flow.cursor = next;
            }
        }
        flow
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The question the cursor points at.
    pub fn current_question(&self) -> &Question {
        self.catalog
            .question_at(self.cursor.phase, self.cursor.question)
            .expect("cursor stays within catalog bounds")
    }

    /// Whether the gate lets the flow advance past the current question.
    pub fn can_advance(&self) -> bool {
        gate::can_advance(self.current_question(), &self.answers, self.bounds_policy)
    }

    /// Completed-phase fraction. Exactly 1.0 once completed.
    pub fn progress(&self) -> f64 {
        match &self.state {
            FlowState::Completed { .. } => 1.0,
            _ => self.cursor.phase as f64 / self.catalog.phase_count() as f64,
        }
    }

    /// Record an answer. Does not move the cursor.
    ///
    /// If the write makes the current question inapplicable (the user went
    /// back and changed a controlling answer), the cursor is realigned to
    /// the nearest applicable question so its invariant keeps holding.
    pub fn set_answer(&mut self, question_id: &str, answer: Answer) -> Result<(), FlowError> {
        if !matches!(self.state, FlowState::Active) {
            return Err(FlowError::InvalidState {
                op: "set_answer",
                state: self.state.to_string(),
            });
        }
        if self.catalog.question_by_id(question_id).is_none() {
            return Err(FlowError::UnknownQuestion(question_id.to_string()));
        }
        self.answers.set(question_id, answer);
        if !self.is_applicable(self.cursor) {
            if let Some(pos) = self
                .next_applicable_after(self.cursor)
                .or_else(|| self.prev_applicable_before(self.cursor))
            {
                self.cursor = pos;
            }
        }
        Ok(())
    }

    /// Advance to the next applicable question.
    ///
    /// Requires the gate to pass for the current question. At the last
    /// applicable question this returns [`Step::AtEnd`] without changing
    /// state; entering `Submitting` is the submission coordinator's job.
    pub fn next(&mut self) -> Result<Step, FlowError> {
        if !matches!(self.state, FlowState::Active) {
            return Err(FlowError::InvalidState {
                op: "next",
                state: self.state.to_string(),
            });
        }
        if !self.can_advance() {
            return Ok(Step::Blocked);
        }
        match self.next_applicable_after(self.cursor) {
            Some(pos) => {
                self.cursor = pos;
                Ok(Step::Moved)
            }
            None => Ok(Step::AtEnd),
        }
    }

    /// Move back to the previous applicable question.
    ///
    /// Applies the same skip rule as [`next`](Self::next), mirrored: a
    /// question skipped on the way forward is skipped on the way back too.
    /// No-op at the first applicable question.
    pub fn previous(&mut self) -> Result<Step, FlowError> {
        if !matches!(self.state, FlowState::Active) {
            return Err(FlowError::InvalidState {
                op: "previous",
                state: self.state.to_string(),
            });
        }
        match self.prev_applicable_before(self.cursor) {
            Some(pos) => {
                self.cursor = pos;
                Ok(Step::Moved)
            }
            None => Ok(Step::AtStart),
        }
    }

    /// Whether the flow sits at the last applicable question with its gate
    /// satisfied, i.e. submission may begin.
    pub fn at_end(&self) -> bool {
        matches!(self.state, FlowState::Active)
            && self.can_advance()
            && self.next_applicable_after(self.cursor).is_none()
    }

    /// Transition into `Submitting`. Legal from `Active` at the end of the
    /// catalog, or from `Failed` (retry).
    pub(crate) fn begin_submission(&mut self) -> Result<(), SubmitError> {
        match &self.state {
            FlowState::Submitting => Err(SubmitError::AlreadyInFlight),
            FlowState::Completed { .. } => Err(SubmitError::AlreadyCompleted),
            FlowState::Failed { .. } => {
                self.state = FlowState::Submitting;
                Ok(())
            }
            FlowState::Active => {
                if !self.at_end() {
                    return Err(SubmitError::NotAtEnd);
                }
                self.state = FlowState::Submitting;
                Ok(())
            }
        }
    }

    /// Record a successful submission.
    pub(crate) fn complete(&mut self, result: Recommendation) {
        self.state = FlowState::Completed {
            result,
            at: Utc::now(),
        };
    }

    /// Record a failed submission. Cursor and answers are untouched.
    pub(crate) fn fail(&mut self, message: String) {
        self.state = FlowState::Failed { message };
    }

    fn is_applicable(&self, cursor: Cursor) -> bool {
        self.catalog
            .question_at(cursor.phase, cursor.question)
            .map(|q| q.is_applicable(&self.answers))
            .unwrap_or(false)
    }

    /// First applicable position strictly after `from`, scanning at most
    /// the catalog length.
    fn next_applicable_after(&self, from: Cursor) -> Option<Cursor> {
        let mut pos = self.increment(from)?;
        loop {
            if self.is_applicable(pos) {
                return Some(pos);
            }
            pos = self.increment(pos)?;
        }
    }

    /// First applicable position strictly before `from`.
    fn prev_applicable_before(&self, from: Cursor) -> Option<Cursor> {
        let mut pos = self.decrement(from)?;
        loop {
            if self.is_applicable(pos) {
                return Some(pos);
            }
            pos = self.decrement(pos)?;
        }
    }

    fn increment(&self, cursor: Cursor) -> Option<Cursor> {
        let phase = self.catalog.phases().get(cursor.phase)?;
        if cursor.question + 1 < phase.questions.len() {
            return Some(Cursor {
                phase: cursor.phase,
                question: cursor.question + 1,
            });
        }
        if cursor.phase + 1 < self.catalog.phase_count() {
            return Some(Cursor {
                phase: cursor.phase + 1,
                question: 0,
            });
        }
        None
    }

    fn decrement(&self, cursor: Cursor) -> Option<Cursor> {
        if cursor.question > 0 {
            return Some(Cursor {
                phase: cursor.phase,
                question: cursor.question - 1,
            });
        }
        if cursor.phase > 0 {
            let prior = &self.catalog.phases()[cursor.phase - 1];
            return Some(Cursor {
                phase: cursor.phase - 1,
                question: prior.questions.len() - 1,
            });
        }
        None
    }
}
