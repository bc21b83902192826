//! Answer transformer — raw answers to the canonical payload.
//!
//! Total and pure: every payload field has a documented default that is
//! substituted when the originating question was skipped, never visited,
//! or answered with something unparsable. Value maps live on the catalog
//! questions and are applied uniformly here. Running the transform twice
//! over the same answers yields identical payloads.

use serde::{Deserialize, Serialize};

use crate::answers::{Answer, AnswerStore};
use crate::catalog::Catalog;

/// Separator used when joining multi-select labels for transport.
const MULTI_SEPARATOR: &str = ", ";

/// The fixed-shape record the recommendation service accepts.
///
/// `Default` carries the documented fallback for every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPayload {
    pub age: i64,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    pub medical_conditions: String,
    pub exercise_freq: i64,
    pub activity_type: String,
    pub activity_intensity: String,
    pub sleep_hours: i64,
    pub goal_declared: String,
    pub goal_timeframe: String,
    pub focus_area: String,
    pub diet_type: String,
    pub diet_special: String,
    pub supplements: String,
    pub current_supplements: String,
    pub supplement_format: String,
    pub product_priority: String,
    pub notifications_enabled: bool,
}

impl Default for CanonicalPayload {
    fn default() -> Self {
        Self {
            age: 25,
            gender: "M".to_string(),
            height: 170.0,
            weight: 70.0,
            medical_conditions: "Ninguna".to_string(),
            exercise_freq: 0,
            activity_type: "Any".to_string(),
            activity_intensity: "Moderate".to_string(),
            sleep_hours: 7,
            goal_declared: "Maintain".to_string(),
            goal_timeframe: "3 meses".to_string(),
            focus_area: "General".to_string(),
            diet_type: "Balanced".to_string(),
            diet_special: "Any".to_string(),
            supplements: "No".to_string(),
            current_supplements: "Ninguno".to_string(),
            supplement_format: "Polvo".to_string(),
            product_priority: "Calidad".to_string(),
            notifications_enabled: false,
        }
    }
}

/// Build the canonical payload from the raw answers.
///
/// An answer only counts if its question is currently applicable: a stale
/// answer left behind by a later-skipped question falls back to the
/// field's default, the same as if it had never been given.
pub fn transform(catalog: &Catalog, answers: &AnswerStore) -> CanonicalPayload {
    let canon = |id: &str| canonical_value(catalog, answers, id);
    let defaults = CanonicalPayload::default();

    CanonicalPayload {
        age: int_or(canon("age"), defaults.age),
        gender: string_or(canon("gender"), defaults.gender),
        height: float_or(canon("height"), defaults.height),
        weight: float_or(canon("weight"), defaults.weight),
        medical_conditions: string_or(canon("medical_conditions"), defaults.medical_conditions),
        exercise_freq: int_or(canon("exercise_frequency"), defaults.exercise_freq),
        activity_type: string_or(canon("activity_type"), defaults.activity_type),
        activity_intensity: string_or(canon("activity_intensity"), defaults.activity_intensity),
        sleep_hours: int_or(canon("sleep_hours"), defaults.sleep_hours),
        goal_declared: string_or(canon("goal"), defaults.goal_declared),
        goal_timeframe: string_or(canon("goal_timeframe"), defaults.goal_timeframe),
        focus_area: string_or(canon("focus_area"), defaults.focus_area),
        diet_type: string_or(canon("diet_type"), defaults.diet_type),
        diet_special: string_or(canon("diet_special"), defaults.diet_special),
        supplements: string_or(canon("supplement_usage"), defaults.supplements),
        current_supplements: string_or(canon("current_supplements"), defaults.current_supplements),
        supplement_format: string_or(canon("supplement_format"), defaults.supplement_format),
        product_priority: string_or(canon("product_priority"), defaults.product_priority),
        notifications_enabled: bool_or(canon("notifications"), defaults.notifications_enabled),
    }
}

/// The canonical string for a question's answer: value-mapped, multi
/// answers joined in selection order. `None` when the question is missing
/// from the catalog, currently inapplicable, or unanswered.
fn canonical_value(catalog: &Catalog, answers: &AnswerStore, id: &str) -> Option<String> {
    let question = catalog.question_by_id(id)?;
    if !question.is_applicable(answers) {
        return None;
    }
    let answer = answers.get(id)?;
    if answer.is_empty() {
        return None;
    }
    match answer {
        Answer::Number(raw) | Answer::Choice(raw) => {
            Some(question.map_label(raw.trim()).to_string())
        }
        Answer::Multi(labels) => Some(
            labels
                .iter()
                .map(|l| question.map_label(l))
                .collect::<Vec<_>>()
                .join(MULTI_SEPARATOR),
        ),
    }
}

fn string_or(value: Option<String>, default: String) -> String {
    value.unwrap_or(default)
}

fn int_or(value: Option<String>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(|v| v.round() as i64)
        .unwrap_or(default)
}

fn float_or(value: Option<String>, default: f64) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(default)
}

fn bool_or(value: Option<String>, default: bool) -> bool {
    value
        .and_then(|v| v.trim().parse::<bool>().ok())
        .unwrap_or(default)
}
