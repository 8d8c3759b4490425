use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::pricing::OccupancyStatus;

/// Per-floorplan simulation profile: daily transition probabilities plus the
/// bedroom count used when bridging census data into pricing trends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorplanProfile {
    pub bedrooms: u8,
    /// Daily probability an occupied tenant gives notice.
    pub notice_daily: f64,
    /// Daily probability a noticed unit is re-rented before move-out.
    pub prelease_daily: f64,
    /// Daily probability a vacant-not-ready unit finishes turnover.
    pub make_ready_daily: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub seed: u32,
    pub start_date: NaiveDate,
    pub profiles: BTreeMap<String, FloorplanProfile>,
    /// Days of notice a departing tenant gives, drawn uniformly.
    pub notice_window_days: (i64, i64),
    /// Gap between a move-out and the incoming prelease start.
    pub turnover_window_days: (i64, i64),
}

impl SimulationConfig {
    pub fn new(seed: u32, start_date: NaiveDate) -> Self {
        Self {
            seed,
            start_date,
            profiles: BTreeMap::new(),
            notice_window_days: (30, 60),
            turnover_window_days: (2, 10),
        }
    }

    pub fn with_profile(mut self, floorplan: &str, profile: FloorplanProfile) -> Self {
        self.profiles.insert(floorplan.to_string(), profile);
        self
    }
}

/// Synthetic unit record. Persists across many ticks and is mutated only by
/// the simulator's own transition logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedUnit {
    pub unit_id: String,
    pub floorplan: String,
    pub rent: f64,
    pub status: OccupancyStatus,
    pub lease_end: Option<NaiveDate>,
    pub prelease_start: Option<NaiveDate>,
    pub vacant_days: u32,
}

impl SimulatedUnit {
    pub fn occupied(unit_id: &str, floorplan: &str, rent: f64) -> Self {
        Self {
            unit_id: unit_id.to_string(),
            floorplan: floorplan.to_string(),
            rent,
            status: OccupancyStatus::Occupied,
            lease_end: None,
            prelease_start: None,
            vacant_days: 0,
        }
    }

    pub fn vacant_ready(unit_id: &str, floorplan: &str, rent: f64) -> Self {
        Self {
            status: OccupancyStatus::VacantReady,
            ..Self::occupied(unit_id, floorplan, rent)
        }
    }
}

/// What one simulated day did, including how many units were skipped for
/// lack of a floorplan profile. A skip count that stays non-zero run after
/// run usually means a mapping bug upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    pub date: NaiveDate,
    pub notices: u32,
    pub preleases: u32,
    pub move_outs: u32,
    pub made_ready: u32,
    pub move_ins: u32,
    pub skipped_units: u32,
}

impl TickSummary {
    pub(crate) fn new(date: NaiveDate) -> Self {
        Self {
            date,
            notices: 0,
            preleases: 0,
            move_outs: 0,
            made_ready: 0,
            move_ins: 0,
            skipped_units: 0,
        }
    }
}

/// Occupancy counts for one floorplan (or the whole community). Offline
/// units are excluded from the denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OccupancyCensus {
    pub total: u32,
    pub current: u32,
    pub trending: u32,
}

impl OccupancyCensus {
    pub fn current_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.current) / f64::from(self.total)
    }

    pub fn trending_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.trending) / f64::from(self.total)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("unknown unit {0}")]
    UnknownUnit(String),
}
