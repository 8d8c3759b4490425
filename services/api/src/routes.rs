use crate::infra::{demo_simulation, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use revenue_ai::workflows::pricing::{pricing_router, CarryForwardStore, PricingEngine};
use revenue_ai::workflows::simulation::TickSummary;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_pricing_routes<S>(engine: Arc<PricingEngine>, store: Arc<S>) -> axum::Router
where
    S: CarryForwardStore + 'static,
{
    pricing_router(engine, store)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/simulation/run",
            axum::routing::post(simulation_run_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct SimulationRunRequest {
    pub(crate) seed: u32,
    pub(crate) days: u32,
    #[serde(default)]
    pub(crate) start_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SimulationRunResponse {
    pub(crate) seed: u32,
    pub(crate) start_date: NaiveDate,
    pub(crate) end_date: NaiveDate,
    pub(crate) final_current_occupancy: f64,
    pub(crate) final_trending_occupancy: f64,
    pub(crate) daily: Vec<TickSummary>,
}

pub(crate) async fn simulation_run_endpoint(
    Json(payload): Json<SimulationRunRequest>,
) -> Result<Json<SimulationRunResponse>, StatusCode> {
    // A year bounds the response size; anything longer is a batch job.
    if payload.days == 0 || payload.days > 366 {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let start_date = payload
        .start_date
        .unwrap_or_else(|| Local::now().date_naive());
    let mut simulator = demo_simulation(payload.seed, start_date);

    let daily: Vec<TickSummary> = (0..payload.days).map(|_| simulator.tick()).collect();
    let census = simulator.community_census();

    Ok(Json(SimulationRunResponse {
        seed: payload.seed,
        start_date,
        end_date: simulator.today(),
        final_current_occupancy: census.current_rate(),
        final_trending_occupancy: census.trending_rate(),
        daily,
    }))
}
