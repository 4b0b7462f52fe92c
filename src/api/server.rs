use crate::api::cli::ServeArgs;
use crate::api::infra::{AppState, InMemorySessionRepository};
use crate::api::routes::with_assessment_routes;
use crate::config::{AppConfig, ServerConfig};
use crate::error::AppError;
use crate::telemetry;
use crate::workflows::assessment::{AssessmentEngine, AssessmentService, QuestionCatalog};
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

fn apply_overrides(server: &mut ServerConfig, args: ServeArgs) {
    if let Some(host) = args.host {
        server.host = host;
    }
    if let Some(port) = args.port {
        server.port = port;
    }
}

fn build_app(catalog: QuestionCatalog, readiness: Arc<AtomicBool>) -> Router {
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let app_state = AppState {
        readiness,
        metrics: Arc::new(prometheus_handle),
    };

    let engine = Arc::new(AssessmentEngine::standard(Arc::new(catalog)));
    let service = Arc::new(AssessmentService::new(
        engine,
        Arc::new(InMemorySessionRepository::default()),
    ));

    with_assessment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
}

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    apply_overrides(&mut config.server, args);
    telemetry::init(&config.telemetry)?;

    // A catalog that fails to load must stop startup before anything binds.
    let catalog = QuestionCatalog::from_path(&config.assessment.questions_path)?;
    info!(
        questions = catalog.len(),
        path = %config.assessment.questions_path.display(),
        "question catalog loaded"
    );

    let readiness = Arc::new(AtomicBool::new(false));
    let app = build_app(catalog, readiness.clone());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);
    info!(?config.environment, %addr, "symptom assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
