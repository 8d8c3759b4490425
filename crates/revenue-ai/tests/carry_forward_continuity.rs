use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{Duration, NaiveDate};
use revenue_ai::workflows::pricing::{
    baselines_from_portfolio, CarryForwardBaseline, CarryForwardStore, CarryForwardStoreError,
    ComfortBand, CommunityMetrics, FloorplanTrend, OccupancyStatus, PricingConfig, PricingContext,
    PricingEngine, PricingFlag, UnitState,
};

#[derive(Default)]
struct MemoryStore {
    baselines: Mutex<BTreeMap<String, CarryForwardBaseline>>,
}

impl CarryForwardStore for MemoryStore {
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

fn unit(unit_id: &str, rent: f64) -> UnitState {
    UnitState {
        unit_id: unit_id.to_string(),
        floorplan: "A1".to_string(),
        floorplan_label: "A1 1BR".to_string(),
        status: OccupancyStatus::Occupied,
        current_rent: rent,
        vacant_days: 0,
        amenity_adjustment: 0.0,
        move_out: None,
        available_on: None,
    }
}

fn context_for(day: NaiveDate, trending: f64, store: &MemoryStore) -> PricingContext {
    let mut context = PricingContext::new(
        day,
        CommunityMetrics {
            trending_occupancy: 0.945,
            current_occupancy: 0.945,
            target_occupancy: 0.945,
        },
    );
    context.trends.insert(
        "A1".to_string(),
        FloorplanTrend {
            floorplan: "A1".to_string(),
            trending_occupancy: trending,
            current_occupancy: trending,
            comfort_band: ComfortBand {
                low: 0.93,
                high: 0.96,
            },
            bedrooms: 1,
        },
    );
    context.seed_rents.insert("A1".to_string(), 1_400.0);
    context.carry_forward = store.fetch_all().expect("store reads");
    context
}

/// Thirty consecutive daily runs with carry-forward feedback and occupancy
/// pinned to the band midpoint: the recommendation must neither drift more
/// than a few dollars day over day nor snap back toward the seed rent.
#[test]
fn thirty_daily_runs_hold_steady_without_snap_back() {
    let engine = PricingEngine::new(PricingConfig::standard()).expect("config valid");
    let store = MemoryStore::default();
    let units = vec![unit("101", 1_500.0), unit("102", 1_520.0)];
    let start = NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date");

    let mut previous_baselines: Option<BTreeMap<String, f64>> = None;

    for day_offset in 0..30 {
        let day = start + Duration::days(day_offset);
        let context = context_for(day, 0.945, &store);

        let portfolio = engine
            .price_portfolio(&units, &context)
            .expect("portfolio prices");

        let todays: BTreeMap<String, f64> = portfolio
            .unit_results()
            .map(|result| (result.unit_id.clone(), result.baseline))
            .collect();

        if let Some(previous) = &previous_baselines {
            for (unit_id, baseline) in &todays {
                let yesterday = previous[unit_id];
                assert!(
                    (baseline - yesterday).abs() <= 5.0,
                    "day {day_offset}: unit {unit_id} moved {yesterday} -> {baseline}"
                );
            }
        }

        // Never anywhere near the 1400 seed: carry-forward wins.
        for baseline in todays.values() {
            assert!(*baseline >= 1_490.0, "snapped back toward seed: {baseline}");
        }

        store
            .record(&baselines_from_portfolio(&portfolio, day, 12))
            .expect("store records");
        previous_baselines = Some(todays);
    }

    // After day one, every run starts from the stored baseline.
    let final_context = context_for(start + Duration::days(30), 0.945, &store);
    let final_portfolio = engine
        .price_portfolio(&units, &final_context)
        .expect("portfolio prices");
    for result in final_portfolio.unit_results() {
        assert!(result.flags.contains(&PricingFlag::CarryForwardApplied));
    }
}

/// A dip below the band walks the baseline down in capped steps instead of
/// repricing from the seed each day.
#[test]
fn sustained_dip_walks_down_in_capped_steps() {
    let engine = PricingEngine::new(PricingConfig::standard()).expect("config valid");
    let store = MemoryStore::default();
    let units = vec![unit("101", 1_500.0)];
    let start = NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date");

    let mut last_baseline = 1_500.0;
    for day_offset in 0..5 {
        let day = start + Duration::days(day_offset);
        let context = context_for(day, 0.88, &store);

        let portfolio = engine
            .price_portfolio(&units, &context)
            .expect("portfolio prices");
        let result = portfolio.unit_results().next().expect("one unit priced");

        // Each step descends (until the floor backstops it), and never by
        // more than the directional cap of the prior day's baseline.
        assert!(result.baseline <= last_baseline);
        assert!(result.baseline >= last_baseline * 0.95 - 1e-9);
        // The floor backstops the walk at 90% of current rent.
        assert!(result.baseline >= 1_350.0);

        store
            .record(&baselines_from_portfolio(&portfolio, day, 12))
            .expect("store records");
        last_baseline = result.baseline;
    }

    // Five capped steps are enough to land on the floor.
    assert_eq!(last_baseline, 1_350.0);
}
