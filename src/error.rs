//! Error types for fit-advisor.

/// Top-level error type for the questionnaire engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Submission error: {0}")]
    Submit(#[from] SubmitError),
}

/// Catalog integrity errors.
///
/// These are construction-time failures: a catalog that produces one of
/// these never reaches the engine. Not recoverable at runtime.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog has no phases")]
    Empty,

    #[error("Duplicate question id: {0}")]
    DuplicateId(String),

    #[error("Question {question} condition references {referenced}, which is not an earlier question")]
    ForwardReference {
        question: String,
        referenced: String,
    },

    #[error("Phase {phase} has no questions")]
    EmptyPhase { phase: String },

    #[error("Question {question} is a choice question but has no options")]
    MissingOptions { question: String },

    #[error("Question {question} maps unknown label {label:?}")]
    UnknownMapLabel { question: String, label: String },
}

/// Flow state errors — illegal operations against the state machine.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Unknown question id: {0}")]
    UnknownQuestion(String),

    #[error("Operation {op} is not allowed in state {state}")]
    InvalidState { op: &'static str, state: String },
}

/// Submission errors. All recoverable: the flow keeps its cursor and
/// answers and may be resubmitted.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("A submission is already in flight")]
    AlreadyInFlight,

    #[error("Submission is only allowed at the final question")]
    NotAtEnd,

    #[error("Flow already completed")]
    AlreadyCompleted,

    #[error("Recommendation service request failed: {0}")]
    Transport(String),

    #[error("Recommendation service returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Invalid response from recommendation service: {0}")]
    InvalidResponse(String),
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
