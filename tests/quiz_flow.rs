//! End-to-end questionnaire flow against a mock recommendation service.
//!
//! Drives the public API the storefront UI uses: walk the default catalog
//! with `set_answer`/`next`, then submit over real HTTP to a wiremock
//! server.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fit_advisor::{
    default_catalog, Answer, BoundsPolicy, CanonicalPayload, EngineConfig, FlowState,
    HttpRecommendationService, NavigationShell, QuizFlow, Recommendation, Step,
    SubmissionCoordinator, SubmitError, RESULTS_ROUTE,
};

/// Records navigations instead of routing anywhere.
#[derive(Default)]
struct RecordingShell {
    visits: Mutex<Vec<(String, Recommendation, CanonicalPayload)>>,
}

#[async_trait]
impl NavigationShell for RecordingShell {
    async fn navigate(&self, route: &str, result: &Recommendation, payload: &CanonicalPayload) {
        self.visits
            .lock()
            .unwrap()
            .push((route.to_string(), result.clone(), payload.clone()));
    }
}

fn plan_body() -> serde_json::Value {
    json!({
        "plan_name": "Plan Definición 12 semanas",
        "description": "Entrenamiento mixto con énfasis en fuerza.",
        "recommendation_summary": "Proteína aislada y creatina monohidratada."
    })
}

fn config_for(server: &MockServer) -> EngineConfig {
    EngineConfig {
        bounds_policy: BoundsPolicy::Advisory,
        service_url: format!("{}/api/recommendations", server.uri()),
        request_timeout: Duration::from_secs(5),
    }
}

/// Walk the full catalog with a realistic set of answers and stop at the
/// final question.
fn answered_flow() -> Arc<RwLock<QuizFlow>> {
    let mut flow = QuizFlow::new(Arc::new(default_catalog()), BoundsPolicy::Advisory);
    let answers: &[(&str, Answer)] = &[
        ("age", Answer::Number("28".into())),
        ("gender", Answer::Choice("Femenino".into())),
        ("height", Answer::Number("165".into())),
        ("weight", Answer::Number("61".into())),
        ("medical_conditions", Answer::Multi(vec!["Ninguna".into()])),
        ("exercise_frequency", Answer::Choice("3 días".into())),
        ("activity_type", Answer::Choice("Mixto".into())),
        ("activity_intensity", Answer::Choice("Moderada".into())),
        ("sleep_hours", Answer::Choice("7 horas".into())),
        ("goal", Answer::Choice("Definir".into())),
        ("goal_timeframe", Answer::Choice("3 meses".into())),
        ("focus_area", Answer::Choice("Core".into())),
        ("diet_type", Answer::Choice("Balanceada".into())),
        ("diet_special", Answer::Choice("Sin preferencia".into())),
        ("supplement_usage", Answer::Choice("No".into())),
        // current_supplements and supplement_format are skipped.
        ("product_priority", Answer::Choice("Calidad".into())),
        ("notifications", Answer::Choice("Sí".into())),
    ];

    for (id, answer) in answers {
        assert_eq!(flow.current_question().id, *id, "unexpected cursor order");
        flow.set_answer(id, answer.clone()).unwrap();
        let step = flow.next().unwrap();
        if *id == "notifications" {
            assert_eq!(step, Step::AtEnd);
        } else {
            assert_eq!(step, Step::Moved, "stuck at {id}");
        }
    }
    assert!(flow.at_end());
    Arc::new(RwLock::new(flow))
}

#[tokio::test]
async fn full_flow_submits_canonical_payload_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations"))
        .and(body_partial_json(json!({
            "age": 28,
            "gender": "F",
            "exercise_freq": 3,
            "activity_type": "Mixed",
            "goal_declared": "Define",
            "supplements": "No",
            "current_supplements": "Ninguno",
            "supplement_format": "Polvo",
            "notifications_enabled": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan_body()))
        .expect(1)
        .mount(&server)
        .await;

    let flow = answered_flow();
    let shell = Arc::new(RecordingShell::default());
    let service = Arc::new(HttpRecommendationService::new(&config_for(&server)).unwrap());
    let coordinator = SubmissionCoordinator::new(service, shell.clone());

    let result = coordinator.submit(&flow).await.unwrap();
    assert_eq!(result.plan_name, "Plan Definición 12 semanas");

    let guard = flow.read().await;
    assert!(matches!(guard.state(), FlowState::Completed { .. }));
    assert_eq!(guard.progress(), 1.0);

    let visits = shell.visits.lock().unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].0, RESULTS_ROUTE);
    assert_eq!(visits[0].2.gender, "F");
}

#[tokio::test]
async fn server_error_fails_flow_then_retry_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("mantenimiento"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan_body()))
        .expect(1)
        .mount(&server)
        .await;

    let flow = answered_flow();
    let shell = Arc::new(RecordingShell::default());
    let service = Arc::new(HttpRecommendationService::new(&config_for(&server)).unwrap());
    let coordinator = SubmissionCoordinator::new(service, shell.clone());

    let err = coordinator.submit(&flow).await.unwrap_err();
    match err {
        SubmitError::Service { status, .. } => assert_eq!(status, 503),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(matches!(flow.read().await.state(), FlowState::Failed { .. }));
    assert!(shell.visits.lock().unwrap().is_empty());

    // Same flow, same answers, second attempt.
    coordinator.submit(&flow).await.unwrap();
    assert!(matches!(
        flow.read().await.state(),
        FlowState::Completed { .. }
    ));
    assert_eq!(shell.visits.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_service_response_is_a_recoverable_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let flow = answered_flow();
    let service = Arc::new(HttpRecommendationService::new(&config_for(&server)).unwrap());
    let coordinator = SubmissionCoordinator::new(service, Arc::new(RecordingShell::default()));

    let err = coordinator.submit(&flow).await.unwrap_err();
    assert!(matches!(err, SubmitError::InvalidResponse(_)));
    assert!(matches!(flow.read().await.state(), FlowState::Failed { .. }));
}
