use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryEnrichmentSink, InMemoryProfileRepository};
use crate::routes::with_interview_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use founder_ai::config::AppConfig;
use founder_ai::error::AppError;
use founder_ai::interview::{CatalogOutline, InterviewService, QuestionCatalog};
use founder_ai::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(capacity) = args.session_capacity.take() {
        config.interview.session_capacity = capacity;
    }

    telemetry::init(&config.telemetry)?;

    let catalog = QuestionCatalog::founder_onboarding();
    let outline = CatalogOutline::from_catalog(&catalog);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        outline: Arc::new(outline),
    };

    let profiles = Arc::new(InMemoryProfileRepository::default());
    let enrichment = Arc::new(InMemoryEnrichmentSink::default());
    let interview_service = Arc::new(InterviewService::new(
        catalog,
        profiles,
        enrichment,
        config.interview.session_capacity,
    ));

    let app = with_interview_routes(interview_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "founder interview service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
