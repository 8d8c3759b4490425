use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::pricing::{
    CarryForwardBaseline, CarryForwardStore, CarryForwardStoreError, ComfortBand,
    CommunityMetrics, ConversionWindow, FloorplanTrend, OccupancyStatus, PricingConfig,
    PricingContext, PricingEngine, SensitivityTier, UnitState,
};

pub(super) fn evaluation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date")
}

pub(super) fn unit(unit_id: &str, floorplan: &str, rent: f64) -> UnitState {
    UnitState {
        unit_id: unit_id.to_string(),
        floorplan: floorplan.to_string(),
        floorplan_label: format!("{floorplan} plan"),
        status: OccupancyStatus::Occupied,
        current_rent: rent,
        vacant_days: 0,
        amenity_adjustment: 0.0,
        move_out: None,
        available_on: None,
    }
}

pub(super) fn trend(
    floorplan: &str,
    trending: f64,
    band: ComfortBand,
    bedrooms: u8,
) -> FloorplanTrend {
    FloorplanTrend {
        floorplan: floorplan.to_string(),
        trending_occupancy: trending,
        current_occupancy: trending,
        comfort_band: band,
        bedrooms,
    }
}

pub(super) fn band() -> ComfortBand {
    ComfortBand {
        low: 0.93,
        high: 0.96,
    }
}

/// Community sitting exactly on target so bias never fires unless a test
/// moves it.
pub(super) fn neutral_community() -> CommunityMetrics {
    CommunityMetrics {
        trending_occupancy: 0.945,
        current_occupancy: 0.945,
        target_occupancy: 0.945,
    }
}

pub(super) fn context_with_trend(trend_record: FloorplanTrend) -> PricingContext {
    let mut context = PricingContext::new(evaluation_date(), neutral_community());
    context
        .trends
        .insert(trend_record.floorplan.clone(), trend_record);
    context
}

pub(super) fn config() -> PricingConfig {
    let mut config = PricingConfig::standard();
    // Pin the pieces the scenarios rely on so defaults can evolve freely.
    config.sensitivity = SensitivityTier::Assertive;
    config.max_decrease_fraction = 0.05;
    config.floor_fraction = 0.90;
    config.absolute_floor = 500.0;
    config
}

pub(super) fn engine() -> PricingEngine {
    PricingEngine::new(config()).expect("standard config is valid")
}

pub(super) fn conversion(leads: u32, applications: u32) -> ConversionWindow {
    ConversionWindow {
        leads,
        applications,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    baselines: Arc<Mutex<BTreeMap<String, CarryForwardBaseline>>>,
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

pub(super) struct UnavailableStore;

impl CarryForwardStore for UnavailableStore {
    fn fetch_all(
        &self,
    ) -> Result<BTreeMap<String, CarryForwardBaseline>, CarryForwardStoreError> {
        Err(CarryForwardStoreError::Unavailable(
            "storage offline".to_string(),
        ))
    }

    fn record(&self, _baselines: &[CarryForwardBaseline]) -> Result<(), CarryForwardStoreError> {
        Err(CarryForwardStoreError::Unavailable(
            "storage offline".to_string(),
        ))
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1_048_576)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
