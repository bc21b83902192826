//! Submission coordination — the single network side effect of the engine.
//!
//! `SubmissionCoordinator` drives one call to the recommendation service
//! per attempt. The `Submitting` flow state doubles as the single-flight
//! guard: a second `submit` while one is in flight is rejected before any
//! network activity happens.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::SubmitError;
use crate::flow::QuizFlow;
use crate::transform::{transform, CanonicalPayload};

/// Route the navigation shell receives on a successful submission.
pub const RESULTS_ROUTE: &str = "results";

/// What the recommendation service returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub plan_name: String,
    pub description: String,
    pub recommendation_summary: String,
}

/// The remote service that turns a canonical payload into a plan.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn submit(&self, payload: &CanonicalPayload) -> Result<Recommendation, SubmitError>;
}

/// The routing shell the storefront runs in. On success the engine hands
/// it the result plus the payload it was derived from; on failure the
/// shell is not involved and the flow stays where it is.
#[async_trait]
pub trait NavigationShell: Send + Sync {
    async fn navigate(&self, route: &str, result: &Recommendation, payload: &CanonicalPayload);
}

/// HTTP-backed recommendation service.
pub struct HttpRecommendationService {
    url: String,
    client: reqwest::Client,
}

impl HttpRecommendationService {
    pub fn new(config: &EngineConfig) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        Ok(Self {
            url: config.service_url.clone(),
            client,
        })
    }
}

#[async_trait]
impl RecommendationService for HttpRecommendationService {
    async fn submit(&self, payload: &CanonicalPayload) -> Result<Recommendation, SubmitError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmitError::Service {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Recommendation>()
            .await
            .map_err(|e| SubmitError::InvalidResponse(e.to_string()))
    }
}

/// Drives submission attempts against a shared flow.
#[derive(Clone)]
pub struct SubmissionCoordinator {
    service: Arc<dyn RecommendationService>,
    shell: Arc<dyn NavigationShell>,
}

impl SubmissionCoordinator {
    pub fn new(service: Arc<dyn RecommendationService>, shell: Arc<dyn NavigationShell>) -> Self {
        Self { service, shell }
    }

    /// Submit the flow's answers.
    ///
    /// Legal from `Active` at the final question or from `Failed` (retry).
    /// The payload is built under the same lock that flips the flow into
    /// `Submitting`, so concurrent callers either win the transition or
    /// get [`SubmitError::AlreadyInFlight`] without touching the network.
    pub async fn submit(
        &self,
        flow: &Arc<RwLock<QuizFlow>>,
    ) -> Result<Recommendation, SubmitError> {
        let payload = {
            let mut flow = flow.write().await;
            flow.begin_submission()?;
            transform(flow.catalog(), flow.answers())
        };

        let attempt = Uuid::new_v4();
        tracing::info!(%attempt, "submitting placement questionnaire");

        match self.service.submit(&payload).await {
            Ok(result) => {
                flow.write().await.complete(result.clone());
                tracing::info!(%attempt, plan = %result.plan_name, "recommendation received");
                self.shell.navigate(RESULTS_ROUTE, &result, &payload).await;
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(%attempt, error = %e, "submission failed; flow is retryable");
                flow.write().await.fail(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use tokio::sync::Notify;

    use crate::answers::Answer;
    use crate::catalog::{default_catalog, QuestionKind};
    use crate::config::BoundsPolicy;
    use crate::flow::{FlowState, Step};

    /// Service stub: counts calls, records payloads, optionally parks
    /// until released, and answers with a fixed outcome.
    struct StubService {
        calls: AtomicUsize,
        payloads: Mutex<Vec<CanonicalPayload>>,
        hold: Option<Arc<Notify>>,
        outcome: Result<Recommendation, SubmitError>,
    }

    impl StubService {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                payloads: Mutex::new(Vec::new()),
                hold: None,
                outcome: Ok(plan()),
            }
        }

        fn failing() -> Self {
            Self {
                outcome: Err(SubmitError::Transport("connection reset".to_string())),
                ..Self::ok()
            }
        }
    }

    #[async_trait]
    impl RecommendationService for StubService {
        async fn submit(&self, payload: &CanonicalPayload) -> Result<Recommendation, SubmitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.payloads.lock().unwrap().push(payload.clone());
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            match &self.outcome {
                Ok(r) => Ok(r.clone()),
                Err(SubmitError::Transport(msg)) => Err(SubmitError::Transport(msg.clone())),
                Err(_) => unreachable!("stub only fails with Transport"),
            }
        }
    }

    /// Shell stub: records every navigation.
    #[derive(Default)]
    struct StubShell {
        visits: Mutex<Vec<(String, Recommendation)>>,
    }

    #[async_trait]
    impl NavigationShell for StubShell {
        async fn navigate(&self, route: &str, result: &Recommendation, _payload: &CanonicalPayload) {
            self.visits
                .lock()
                .unwrap()
                .push((route.to_string(), result.clone()));
        }
    }

    fn plan() -> Recommendation {
        Recommendation {
            plan_name: "Plan Definición".to_string(),
            description: "Proteína + creatina, 12 semanas".to_string(),
            recommendation_summary: "Enfocado en definición con dieta balanceada".to_string(),
        }
    }

    /// A flow answered all the way to its final question.
    fn finished_flow() -> Arc<RwLock<QuizFlow>> {
        let mut flow = QuizFlow::new(Arc::new(default_catalog()), BoundsPolicy::Advisory);
        loop {
            let question = flow.current_question().clone();
            let answer = match question.kind {
                QuestionKind::Number => Answer::Number("42".to_string()),
                QuestionKind::Radio | QuestionKind::Select => {
                    Answer::Choice(question.options[0].clone())
                }
                QuestionKind::Checkbox => Answer::Multi(vec![question.options[0].clone()]),
            };
            flow.set_answer(&question.id, answer).unwrap();
            if flow.next().unwrap() == Step::AtEnd {
                break;
            }
        }
        Arc::new(RwLock::new(flow))
    }

    #[tokio::test]
    async fn successful_submission_completes_and_navigates() {
        let service = Arc::new(StubService::ok());
        let shell = Arc::new(StubShell::default());
        let coordinator = SubmissionCoordinator::new(service.clone(), shell.clone());
        let flow = finished_flow();

        let result = coordinator.submit(&flow).await.unwrap();
        assert_eq!(result, plan());
        assert!(matches!(
            flow.read().await.state(),
            FlowState::Completed { .. }
        ));
        assert_eq!(flow.read().await.progress(), 1.0);

        let visits = shell.visits.lock().unwrap();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].0, RESULTS_ROUTE);
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_makes_no_network_call() {
        let hold = Arc::new(Notify::new());
        let service = Arc::new(StubService {
            hold: Some(hold.clone()),
            ..StubService::ok()
        });
        let shell = Arc::new(StubShell::default());
        let coordinator = SubmissionCoordinator::new(service.clone(), shell);
        let flow = finished_flow();

        let first = {
            let coordinator = coordinator.clone();
            let flow = flow.clone();
            tokio::spawn(async move { coordinator.submit(&flow).await })
        };
        // Wait until the first attempt reaches the service.
        while service.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = coordinator.submit(&flow).await;
        assert!(matches!(second, Err(SubmitError::AlreadyInFlight)));
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);

        hold.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_leaves_flow_retryable_with_identical_payload() {
        let failing = Arc::new(StubService::failing());
        let shell = Arc::new(StubShell::default());
        let flow = finished_flow();

        let coordinator = SubmissionCoordinator::new(failing.clone(), shell.clone());
        let err = coordinator.submit(&flow).await.unwrap_err();
        assert!(matches!(err, SubmitError::Transport(_)));
        assert!(matches!(flow.read().await.state(), FlowState::Failed { .. }));
        assert!(
            shell.visits.lock().unwrap().is_empty(),
            "no navigation on failure"
        );

        // Retry with unchanged answers must produce the identical payload.
        let retry = SubmissionCoordinator::new(failing.clone(), shell.clone());
        let _ = retry.submit(&flow).await.unwrap_err();
        let payloads = failing.payloads.lock().unwrap();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0], payloads[1]);
    }

    #[tokio::test]
    async fn failed_then_successful_retry_completes() {
        let flow = finished_flow();
        let shell = Arc::new(StubShell::default());

        let failing = SubmissionCoordinator::new(Arc::new(StubService::failing()), shell.clone());
        let _ = failing.submit(&flow).await.unwrap_err();

        let ok = SubmissionCoordinator::new(Arc::new(StubService::ok()), shell.clone());
        let result = ok.submit(&flow).await.unwrap();
        assert_eq!(result, plan());
        assert!(matches!(
            flow.read().await.state(),
            FlowState::Completed { .. }
        ));
        assert_eq!(shell.visits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn submit_before_the_final_question_is_rejected() {
        let service = Arc::new(StubService::ok());
        let coordinator =
            SubmissionCoordinator::new(service.clone(), Arc::new(StubShell::default()));
        let flow = Arc::new(RwLock::new(QuizFlow::new(
            Arc::new(default_catalog()),
            BoundsPolicy::Advisory,
        )));

        let err = coordinator.submit(&flow).await.unwrap_err();
        assert!(matches!(err, SubmitError::NotAtEnd));
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }
}
