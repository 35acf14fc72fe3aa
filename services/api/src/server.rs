use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCorrectiveActionRepository, InMemoryTierAlertPublisher};
use crate::routes::with_discipline_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use care_ops::config::AppConfig;
use care_ops::error::AppError;
use care_ops::telemetry;
use care_ops::workflows::discipline::DisciplineService;
use std::sync::atomic::{AtomicBool, Ordering};
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

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        negative_points: config.discipline.negative_points,
    };

    let repository = Arc::new(InMemoryCorrectiveActionRepository::default());
    let alerts = Arc::new(InMemoryTierAlertPublisher::default());
    let discipline_service = Arc::new(DisciplineService::new(
        repository,
        alerts,
        config.discipline.negative_points,
    ));

    let app = with_discipline_routes(discipline_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        negative_points = ?config.discipline.negative_points,
        "care ops discipline service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
