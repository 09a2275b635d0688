use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionRepository};
use crate::routes::with_bonus_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bonus_sim::config::AppConfig;
use bonus_sim::error::AppError;
use bonus_sim::telemetry;
use bonus_sim::workflows::bonus::BonusService;
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

    let repository = Arc::new(InMemorySessionRepository::default());
    let bonus_service = Arc::new(BonusService::new(repository, config.bonus.calculation));

    let gate = config.bonus.access_gate();
    if gate.is_open() {
        warn!("BONUS_ACCESS_PASSWORD not set; bonus API is open");
    }

    let app = with_bonus_routes(bonus_service, gate)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy = config.bonus.calculation.policy.label(),
        axis = config.bonus.calculation.corporate_axis.label(),
        "bonus simulator ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
