use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::domain::CarryForwardBaseline;
use super::result::PortfolioPricing;

/// Storage abstraction so approved baselines survive between runs. The
/// engine itself never touches storage; an adapter loads the map into the
/// context before a run and records approvals after it.
pub trait CarryForwardStore: Send + Sync {
    fn fetch_all(&self) -> Result<BTreeMap<String, CarryForwardBaseline>, CarryForwardStoreError>;
    fn record(&self, baselines: &[CarryForwardBaseline]) -> Result<(), CarryForwardStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CarryForwardStoreError {
    #[error("carry-forward store unavailable: {0}")]
    Unavailable(String),
}

/// Turn a finished portfolio run into the baselines to record for the next
/// run's starting points.
pub fn baselines_from_portfolio(
    portfolio: &PortfolioPricing,
    approved_on: NaiveDate,
    reference_term: u32,
) -> Vec<CarryForwardBaseline> {
    portfolio
        .unit_results()
        .map(|result| CarryForwardBaseline {
            unit_id: result.unit_id.clone(),
            floorplan: result.floorplan.clone(),
            baseline: result.baseline,
            approved_on,
            reference_term,
        })
        .collect()
}
