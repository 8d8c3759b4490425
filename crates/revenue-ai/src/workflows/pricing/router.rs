use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::context::PricingContext;
use super::domain::UnitState;
use super::engine::PricingEngine;
use super::result::PortfolioPricing;
use super::store::{baselines_from_portfolio, CarryForwardStore};

/// Router builder exposing HTTP endpoints for portfolio pricing runs.
pub fn pricing_router<S>(engine: Arc<PricingEngine>, store: Arc<S>) -> Router
where
    S: CarryForwardStore + 'static,
{
    Router::new()
        .route("/api/v1/pricing/run", post(run_handler::<S>))
        .route(
            "/api/v1/pricing/carry-forward",
            get(carry_forward_handler::<S>),
        )
        .with_state((engine, store))
}

#[derive(Debug, Deserialize)]
pub struct RunPricingRequest {
    pub units: Vec<UnitState>,
    pub context: PricingContext,
    /// Record the finalized baselines as next run's starting points.
    #[serde(default)]
    pub record_approvals: bool,
}

#[derive(Debug, Serialize)]
pub struct RunPricingResponse {
    pub portfolio: PortfolioPricing,
    pub approvals_recorded: bool,
}

pub(crate) async fn run_handler<S>(
    State((engine, store)): State<(Arc<PricingEngine>, Arc<S>)>,
    axum::Json(request): axum::Json<RunPricingRequest>,
) -> Response
where
    S: CarryForwardStore + 'static,
{
    let RunPricingRequest {
        units,
        mut context,
        record_approvals,
    } = request;

    // Explicit payload entries win; stored baselines fill the gaps so
    // repeated runs against the same store never snap back.
    if engine.config().features.carry_forward {
        match store.fetch_all() {
            Ok(stored) => {
                for (unit_id, baseline) in stored {
                    context.carry_forward.entry(unit_id).or_insert(baseline);
                }
            }
            Err(error) => {
                let payload = json!({ "error": error.to_string() });
                return (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response();
            }
        }
    }

    let portfolio = match engine.price_portfolio(&units, &context) {
        Ok(portfolio) => portfolio,
        // Both variants are caller contract violations.
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    let mut approvals_recorded = false;
    if record_approvals {
        let baselines = baselines_from_portfolio(
            &portfolio,
            context.evaluation_date,
            engine.config().reference_term,
        );
        if let Err(error) = store.record(&baselines) {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response();
        }
        approvals_recorded = true;
    }

    (
        StatusCode::OK,
        axum::Json(RunPricingResponse {
            portfolio,
            approvals_recorded,
        }),
    )
        .into_response()
}

pub(crate) async fn carry_forward_handler<S>(
    State((_, store)): State<(Arc<PricingEngine>, Arc<S>)>,
) -> Response
where
    S: CarryForwardStore + 'static,
{
    match store.fetch_all() {
        Ok(baselines) => {
            let entries: Vec<_> = baselines.into_values().collect();
            (StatusCode::OK, axum::Json(entries)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
