//! fit-advisor — adaptive placement-questionnaire engine.
//!
//! Walks a phased question catalog, gates advancement per question type,
//! canonicalizes raw answers through data-driven value maps, and drives a
//! single submission to the recommendation service.

pub mod answers;
pub mod catalog;
pub mod config;
pub mod error;
pub mod flow;
pub mod gate;
pub mod submit;
pub mod transform;

pub use answers::{Answer, AnswerStore};
pub use catalog::{default_catalog, Catalog, Condition, Phase, Question, QuestionKind};
pub use config::{BoundsPolicy, EngineConfig};
pub use error::{CatalogError, Error, FlowError, Result, SubmitError};
pub use flow::{Cursor, FlowState, QuizFlow, Step};
pub use submit::{
    HttpRecommendationService, NavigationShell, Recommendation, RecommendationService,
    SubmissionCoordinator, RESULTS_ROUTE,
};
pub use transform::{transform, CanonicalPayload};
