use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use revenue_ai::workflows::pricing::{
    CarryForwardBaseline, CarryForwardStore, CarryForwardStoreError, PricingConfig,
    PricingContext, UnitState,
};
use revenue_ai::workflows::simulation::{
    FloorplanProfile, OccupancySimulator, SimulatedUnit, SimulationConfig,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory carry-forward store. Real deployments put a durable adapter
/// behind the same trait; the engine never knows the difference.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCarryForwardStore {
    baselines: Arc<Mutex<BTreeMap<String, CarryForwardBaseline>>>,
}

impl CarryForwardStore for InMemoryCarryForwardStore {
    fn fetch_all(
        &self,
    ) -> Result<BTreeMap<String, CarryForwardBaseline>, CarryForwardStoreError> {
        Ok(self.baselines.lock().expect("store mutex poisoned").clone())
    }

    fn record(&self, baselines: &[CarryForwardBaseline]) -> Result<(), CarryForwardStoreError> {
        let mut guard = self.baselines.lock().expect("store mutex poisoned");
        for baseline in baselines {
            guard.insert(baseline.unit_id.clone(), baseline.clone());
        }
        Ok(())
    }
}

pub(crate) fn default_pricing_config() -> PricingConfig {
    let mut config = PricingConfig::standard();
    config.features.simulation_source = true;
    config
}

/// Demo portfolio: three floorplans with slightly different churn.
pub(crate) fn demo_simulation(seed: u32, start_date: NaiveDate) -> OccupancySimulator {
    let config = SimulationConfig::new(seed, start_date)
        .with_profile(
            "S0",
            FloorplanProfile {
                bedrooms: 0,
                notice_daily: 0.014,
                prelease_daily: 0.05,
                make_ready_daily: 0.15,
            },
        )
        .with_profile(
            "A1",
            FloorplanProfile {
                bedrooms: 1,
                notice_daily: 0.011,
                prelease_daily: 0.04,
                make_ready_daily: 0.12,
            },
        )
        .with_profile(
            "B2",
            FloorplanProfile {
                bedrooms: 2,
                notice_daily: 0.008,
                prelease_daily: 0.03,
                make_ready_daily: 0.10,
            },
        );

    let mut units = Vec::new();
    for (floorplan, count, rent) in [("S0", 16, 995.0), ("A1", 48, 1_285.0), ("B2", 28, 1_690.0)]
    {
        for index in 0..count {
            units.push(SimulatedUnit::occupied(
                &format!("{floorplan}-{index:03}"),
                floorplan,
                rent,
            ));
        }
    }

    OccupancySimulator::new(config, units)
}

/// Assemble a pricing context from the simulator's current census.
pub(crate) fn context_from_simulator(
    simulator: &OccupancySimulator,
    pricing: &PricingConfig,
) -> PricingContext {
    let mut context = PricingContext::new(
        simulator.today(),
        simulator.community_metrics(pricing.target_occupancy),
    );
    for trend in simulator.floorplan_trends(pricing) {
        context.trends.insert(trend.floorplan.clone(), trend);
    }
    context
}

/// Derive trend records from an imported rent roll's own status census: the
/// roll carries enough signal for a standalone CLI run, and the HTTP API
/// accepts explicit trends for anything richer.
pub(crate) fn context_from_rent_roll(
    units: &[UnitState],
    as_of: NaiveDate,
    pricing: &PricingConfig,
) -> PricingContext {
    use revenue_ai::workflows::pricing::{CommunityMetrics, FloorplanTrend};

    #[derive(Default)]
    struct Census {
        total: u32,
        current: u32,
        trending: u32,
    }

    let mut by_floorplan: BTreeMap<String, Census> = BTreeMap::new();
    let mut community = Census::default();
    for unit in units {
        if !unit.status.in_service() {
            continue;
        }
        let entry = by_floorplan.entry(unit.floorplan.clone()).or_default();
        entry.total += 1;
        community.total += 1;
        if unit.status.counts_as_current() {
            entry.current += 1;
            community.current += 1;
        }
        if unit.status.counts_as_trending() {
            entry.trending += 1;
            community.trending += 1;
        }
    }

    let rate = |part: u32, total: u32| {
        if total == 0 {
            0.0
        } else {
            f64::from(part) / f64::from(total)
        }
    };

    let mut context = PricingContext::new(
        as_of,
        CommunityMetrics {
            trending_occupancy: rate(community.trending, community.total),
            current_occupancy: rate(community.current, community.total),
            target_occupancy: pricing.target_occupancy,
        },
    );

    for (floorplan, census) in by_floorplan {
        let trend = FloorplanTrend {
            comfort_band: pricing.comfort_band_for(&floorplan),
            trending_occupancy: rate(census.trending, census.total),
            current_occupancy: rate(census.current, census.total),
            bedrooms: bedrooms_from_code(&floorplan),
            floorplan: floorplan.clone(),
        };
        context.trends.insert(floorplan, trend);
    }

    context
}

// Rent rolls do not carry bedroom counts; the trailing digit convention
// ("A1", "B2") covers the exports we ingest today.
fn bedrooms_from_code(floorplan: &str) -> u8 {
    floorplan
        .chars()
        .rev()
        .find(|character| character.is_ascii_digit())
        .and_then(|digit| digit.to_digit(10))
        .map(|digit| digit as u8)
        .unwrap_or(0)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
