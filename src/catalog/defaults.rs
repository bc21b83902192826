//! The storefront's placement questionnaire, as plain data.
//!
//! Display labels are the Spanish copy shown to shoppers; value maps carry
//! each label to the canonical value the recommendation service expects.

use std::collections::BTreeMap;

use super::{Catalog, Condition, NumericBounds, Phase, Question, QuestionKind};

fn value_map(pairs: &[(&str, &str)]) -> Option<BTreeMap<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(label, canonical)| (label.to_string(), canonical.to_string()))
            .collect(),
    )
}

fn number(id: &str, text: &str, min: f64, max: f64) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        kind: QuestionKind::Number,
        options: vec![],
        value_map: None,
        bounds: Some(NumericBounds { min, max }),
        condition: None,
    }
}

fn choice(
    kind: QuestionKind,
    id: &str,
    text: &str,
    options: &[&str],
    map: Option<BTreeMap<String, String>>,
) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        kind,
        options: options.iter().map(|o| o.to_string()).collect(),
        value_map: map,
        bounds: None,
        condition: None,
    }
}

/// Build the production questionnaire. Panics only if the static data is
/// internally inconsistent, which the catalog tests pin down.
pub fn default_catalog() -> Catalog {
    let phases = vec![
        Phase {
            title: "Datos personales".to_string(),
            questions: vec![
                number("age", "¿Cuál es tu edad?", 16.0, 90.0),
                choice(
                    QuestionKind::Radio,
                    "gender",
                    "¿Cuál es tu género?",
                    &["Masculino", "Femenino"],
                    value_map(&[("Masculino", "M"), ("Femenino", "F")]),
                ),
                number("height", "¿Cuál es tu estatura en centímetros?", 120.0, 220.0),
                number("weight", "¿Cuál es tu peso en kilogramos?", 30.0, 250.0),
            ],
        },
        Phase {
            title: "Salud y actividad".to_string(),
            questions: vec![
                choice(
                    QuestionKind::Checkbox,
                    "medical_conditions",
                    "¿Tienes alguna condición médica?",
                    &[
                        "Ninguna",
                        "Diabetes",
                        "Hipertensión",
                        "Lesión articular",
                        "Otra",
                    ],
                    None,
                ),
                choice(
                    QuestionKind::Select,
                    "exercise_frequency",
                    "¿Cuántos días a la semana entrenas?",
                    &[
                        "No entreno",
                        "1 día",
                        "2 días",
                        "3 días",
                        "4 días",
                        "5 días o más",
                    ],
                    value_map(&[
                        ("No entreno", "0"),
                        ("1 día", "1"),
                        ("2 días", "2"),
                        ("3 días", "3"),
                        ("4 días", "4"),
                        ("5 días o más", "5"),
                    ]),
                ),
                choice(
                    QuestionKind::Radio,
                    "activity_type",
                    "¿Qué tipo de actividad prefieres?",
                    &["Cardio", "Fuerza", "Mixto", "Cualquiera"],
                    value_map(&[
                        ("Cardio", "Cardio"),
                        ("Fuerza", "Strength"),
                        ("Mixto", "Mixed"),
                        ("Cualquiera", "Any"),
                    ]),
                ),
                choice(
                    QuestionKind::Radio,
                    "activity_intensity",
                    "¿Con qué intensidad entrenas?",
                    &["Baja", "Moderada", "Alta"],
                    value_map(&[("Baja", "Low"), ("Moderada", "Moderate"), ("Alta", "High")]),
                ),
                choice(
                    QuestionKind::Select,
                    "sleep_hours",
                    "¿Cuántas horas duermes por noche?",
                    &[
                        "5 horas o menos",
                        "6 horas",
                        "7 horas",
                        "8 horas",
                        "9 horas o más",
                    ],
                    value_map(&[
                        ("5 horas o menos", "5"),
                        ("6 horas", "6"),
                        ("7 horas", "7"),
                        ("8 horas", "8"),
                        ("9 horas o más", "9"),
                    ]),
                ),
            ],
        },
        Phase {
            title: "Objetivos".to_string(),
            questions: vec![
                choice(
                    QuestionKind::Radio,
                    "goal",
                    "¿Cuál es tu objetivo principal?",
                    &[
                        "Ganar músculo",
                        "Perder grasa",
                        "Mantenerme",
                        "Definir",
                        "Nutrición",
                    ],
                    value_map(&[
                        ("Ganar músculo", "Gain Muscle"),
                        ("Perder grasa", "Lose Fat"),
                        ("Mantenerme", "Maintain"),
                        ("Definir", "Define"),
                        ("Nutrición", "Nutrition"),
                    ]),
                ),
                choice(
                    QuestionKind::Select,
                    "goal_timeframe",
                    "¿En cuánto tiempo quieres lograrlo?",
                    &["1 mes", "3 meses", "6 meses", "1 año"],
                    None,
                ),
                {
                    let mut q = choice(
                        QuestionKind::Select,
                        "focus_area",
                        "¿Qué zona quieres trabajar más?",
                        &["General", "Tren superior", "Tren inferior", "Core"],
                        None,
                    );
                    q.condition = Some(Condition::AnswerNotIn {
                        question: "goal".to_string(),
                        labels: vec!["Nutrición".to_string()],
                    });
                    q
                },
            ],
        },
        Phase {
            title: "Alimentación".to_string(),
            questions: vec![
                choice(
                    QuestionKind::Radio,
                    "diet_type",
                    "¿Cómo describirías tu dieta?",
                    &[
                        "Alta en proteína",
                        "Baja en carbohidratos",
                        "Balanceada",
                        "Alta en grasas",
                    ],
                    value_map(&[
                        ("Alta en proteína", "High Protein"),
                        ("Baja en carbohidratos", "Low Carb"),
                        ("Balanceada", "Balanced"),
                        ("Alta en grasas", "High Fat"),
                    ]),
                ),
                choice(
                    QuestionKind::Radio,
                    "diet_special",
                    "¿Sigues algún régimen especial?",
                    &["Sin preferencia", "Vegetariana", "Vegana", "Keto"],
                    value_map(&[
                        ("Sin preferencia", "Any"),
                        ("Vegetariana", "Vegetarian"),
                        ("Vegana", "Vegan"),
                        ("Keto", "Keto"),
                    ]),
                ),
            ],
        },
        Phase {
            title: "Suplementos y preferencias".to_string(),
            questions: vec![
                choice(
                    QuestionKind::Radio,
                    "supplement_usage",
                    "¿Consumes suplementos actualmente?",
                    &["Sí", "Ocasional", "No"],
                    value_map(&[("Sí", "Yes"), ("Ocasional", "Ocasional"), ("No", "No")]),
                ),
                {
                    let mut q = choice(
                        QuestionKind::Checkbox,
                        "current_supplements",
                        "¿Cuáles consumes?",
                        &[
                            "Proteína",
                            "Creatina",
                            "Pre-entreno",
                            "Multivitamínico",
                            "Omega 3",
                        ],
                        None,
                    );
                    q.condition = Some(Condition::AnswerIn {
                        question: "supplement_usage".to_string(),
                        labels: vec!["Sí".to_string(), "Ocasional".to_string()],
                    });
                    q
                },
                {
                    let mut q = choice(
                        QuestionKind::Radio,
                        "supplement_format",
                        "¿Qué formato prefieres?",
                        &["Polvo", "Cápsulas", "Gomitas"],
                        None,
                    );
                    q.condition = Some(Condition::AnswerIn {
                        question: "supplement_usage".to_string(),
                        labels: vec!["Sí".to_string(), "Ocasional".to_string()],
                    });
                    q
                },
                choice(
                    QuestionKind::Radio,
                    "product_priority",
                    "¿Qué valoras más en un producto?",
                    &["Calidad", "Precio", "Sabor", "Marca"],
                    None,
                ),
                choice(
                    QuestionKind::Radio,
                    "notifications",
                    "¿Quieres recibir recordatorios de tu plan?",
                    &["Sí", "No"],
                    value_map(&[("Sí", "true"), ("No", "false")]),
                ),
            ],
        },
    ];

    Catalog::new(phases).expect("default catalog is internally consistent")
}
