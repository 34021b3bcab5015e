use crate::cli::ServeArgs;
use crate::infra::{build_catalog, AppState};
use crate::routes::with_funding_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use priority_funding::config::AppConfig;
use priority_funding::error::AppError;
use priority_funding::funding::PriorityFundingService;
use priority_funding::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(build_catalog(&config.funding)?);
    let funding_service = Arc::new(PriorityFundingService::new(catalog, &config.funding)?);

    let app = with_funding_routes(funding_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        country = %config.funding.default_country,
        pool = config.funding.total_pool,
        "priority funding service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
