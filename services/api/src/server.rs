use crate::cli::ServeArgs;
use crate::infra::{default_pricing_config, AppState, InMemoryCarryForwardStore};
use crate::routes::with_pricing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use revenue_ai::config::AppConfig;
use revenue_ai::error::AppError;
use revenue_ai::telemetry;
use revenue_ai::workflows::pricing::PricingEngine;
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

    let engine = Arc::new(PricingEngine::new(default_pricing_config())?);
    let store = Arc::new(InMemoryCarryForwardStore::default());

    let app = with_pricing_routes(engine, store)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "revenue pricing orchestrator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
