use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{CarryForwardBaseline, CommunityMetrics, FloorplanTrend};

/// Lead and application counts over the configured lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionWindow {
    pub leads: u32,
    pub applications: u32,
}

impl ConversionWindow {
    /// Applications per lead; `None` when there were no leads to convert.
    pub fn ratio(&self) -> Option<f64> {
        if self.leads == 0 {
            return None;
        }
        Some(f64::from(self.applications) / f64::from(self.leads))
    }
}

/// Read-only aggregate of everything a pricing run is allowed to see. The
/// engine never reaches outside it: no storage, no clock, no globals.
///
/// Constructed whole by the caller before each run and discarded after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingContext {
    pub evaluation_date: NaiveDate,
    pub trends: BTreeMap<String, FloorplanTrend>,
    pub community: CommunityMetrics,
    /// Prior approved baselines keyed by unit id.
    pub carry_forward: BTreeMap<String, CarryForwardBaseline>,
    /// Fallback starting rents keyed by floorplan, for units with no
    /// current rent and no carry-forward history.
    pub seed_rents: BTreeMap<String, f64>,
    /// Lead/application windows keyed by floorplan; optional.
    pub conversions: BTreeMap<String, ConversionWindow>,
}

impl PricingContext {
    pub fn new(evaluation_date: NaiveDate, community: CommunityMetrics) -> Self {
        Self {
            evaluation_date,
            trends: BTreeMap::new(),
            community,
            carry_forward: BTreeMap::new(),
            seed_rents: BTreeMap::new(),
            conversions: BTreeMap::new(),
        }
    }

    pub fn trend_for(&self, floorplan: &str) -> Option<&FloorplanTrend> {
        self.trends.get(floorplan)
    }

    pub fn carry_forward_for(&self, unit_id: &str) -> Option<&CarryForwardBaseline> {
        self.carry_forward.get(unit_id)
    }

    pub fn seed_rent_for(&self, floorplan: &str) -> Option<f64> {
        self.seed_rents.get(floorplan).copied()
    }

    pub fn conversion_for(&self, floorplan: &str) -> Option<ConversionWindow> {
        self.conversions.get(floorplan).copied()
    }
}
