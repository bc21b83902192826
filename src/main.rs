//! Interactive stdin runner for the placement questionnaire.
//!
//! Walks the default catalog question by question, submits to the
//! recommendation service, and prints the plan it comes back with.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::RwLock;

use fit_advisor::{
    default_catalog, Answer, BoundsPolicy, CanonicalPayload, EngineConfig,
    HttpRecommendationService, NavigationShell, QuestionKind, QuizFlow, Recommendation, Step,
    SubmissionCoordinator,
};

/// Shell for the CLI: "navigation" is printing the results page.
struct PrintShell;

#[async_trait]
impl NavigationShell for PrintShell {
    async fn navigate(&self, route: &str, result: &Recommendation, _payload: &CanonicalPayload) {
        println!("\n── {route} ──────────────────────────────");
        println!("{}", result.plan_name);
        println!("{}", result.description);
        println!("{}", result.recommendation_summary);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let mut config = EngineConfig::default();
    if let Ok(url) = std::env::var("FIT_ADVISOR_API_URL") {
        config.service_url = url;
    }
    if std::env::var("FIT_ADVISOR_ENFORCE_BOUNDS").is_ok() {
        config.bounds_policy = BoundsPolicy::Enforce;
    }

    eprintln!("fit-advisor v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Service: {}", config.service_url);
    eprintln!("   Answer with the option number (or free text for numeric questions).");
    eprintln!("   'b' goes back, 'q' quits.\n");

    let service = Arc::new(HttpRecommendationService::new(&config)?);
    let coordinator = SubmissionCoordinator::new(service, Arc::new(PrintShell));
    let flow = Arc::new(RwLock::new(QuizFlow::new(
        Arc::new(default_catalog()),
        config.bounds_policy,
    )));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let (question, phase_title, progress) = {
            let flow = flow.read().await;
            let cursor = flow.cursor();
            (
                flow.current_question().clone(),
                flow.catalog().phases()[cursor.phase].title.clone(),
                flow.progress(),
            )
        };

        println!("\n[{phase_title} · {:.0}%]", progress * 100.0);
        println!("{}", question.text);
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }

        let Some(line) = read_line(&mut lines).await? else {
            return Ok(());
        };
        match line.as_str() {
            "q" => return Ok(()),
            "b" => {
                flow.write().await.previous()?;
                continue;
            }
            _ => {}
        }

        let Some(answer) = parse_answer(&question.kind, &question.options, &line) else {
            println!("No entendí esa respuesta, intenta de nuevo.");
            continue;
        };

        let step = {
            let mut flow = flow.write().await;
            flow.set_answer(&question.id, answer)?;
            flow.next()?
        };

        match step {
            Step::Moved => {}
            Step::Blocked => println!("Esa respuesta no es válida para esta pregunta."),
            Step::AtStart => {}
            Step::AtEnd => match coordinator.submit(&flow).await {
                Ok(_) => return Ok(()),
                Err(e) => {
                    println!("No pudimos obtener tu recomendación: {e}");
                    println!("Presiona Enter para reintentar, o 'q' para salir.");
                    match read_line(&mut lines).await? {
                        Some(l) if l == "q" => return Ok(()),
                        Some(_) => match coordinator.submit(&flow).await {
                            Ok(_) => return Ok(()),
                            Err(e) => {
                                println!("Reintento fallido: {e}");
                                return Ok(());
                            }
                        },
                        None => return Ok(()),
                    }
                }
            },
        }
    }
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<Option<String>> {
    print!("> ");
    use std::io::Write;
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.map(|l| l.trim().to_string()))
}

/// Turn a line of input into an answer for the question kind.
///
/// Choice questions take a 1-based option number; checkboxes take a
/// comma-separated list of numbers, selection order preserved.
fn parse_answer(kind: &QuestionKind, options: &[String], line: &str) -> Option<Answer> {
    match kind {
        QuestionKind::Number => {
            if line.is_empty() {
                None
            } else {
                Some(Answer::Number(line.to_string()))
            }
        }
        QuestionKind::Radio | QuestionKind::Select => {
            let index = line.parse::<usize>().ok()?.checked_sub(1)?;
            options.get(index).cloned().map(Answer::Choice)
        }
        QuestionKind::Checkbox => {
            let mut labels = Vec::new();
            for part in line.split(',') {
                let index = part.trim().parse::<usize>().ok()?.checked_sub(1)?;
                let label = options.get(index)?.clone();
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
            if labels.is_empty() {
                None
            } else {
                Some(Answer::Multi(labels))
            }
        }
    }
}
