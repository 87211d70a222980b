use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryQuizResultRepository, PlainTextReportGenerator, TracingAnalyticsSink,
};
use crate::routes::with_quiz_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use srecno_quiz::config::AppConfig;
use srecno_quiz::error::AppError;
use srecno_quiz::quiz::QuizService;
use srecno_quiz::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let quiz_service = Arc::new(QuizService::new(
        Arc::new(InMemoryQuizResultRepository::default()),
        Arc::new(TracingAnalyticsSink),
        Arc::new(PlainTextReportGenerator),
        config.lead_scoring.clone(),
    ));

    for quiz in quiz_service.catalog().definitions() {
        if let Err(err) = quiz.validate() {
            warn!(quiz = %quiz.quiz_type, error = %err, "quiz definition failed validation");
        }
    }

    let app = with_quiz_routes(quiz_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "quiz service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
