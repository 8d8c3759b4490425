use std::collections::BTreeMap;

use chrono::{Duration, Months, NaiveDate};

use super::domain::{
    FloorplanProfile, OccupancyCensus, SimulatedUnit, SimulationConfig, SimulationError,
    TickSummary,
};
use super::sequence::DeterministicSequence;
use crate::workflows::pricing::{
    CommunityMetrics, FloorplanTrend, OccupancyStatus, PricingConfig, UnitState,
};

/// Stateful occupancy simulator. One `tick()` advances every unit exactly
/// one simulated day, drawing randomness in the stored unit order; that
/// fixed order is what makes a seed reproduce a whole trajectory.
///
/// Single-caller only: concurrent ticks on one instance are undefined, so
/// the type is deliberately not `Sync`-friendly for shared mutation.
pub struct OccupancySimulator {
    config: SimulationConfig,
    units: Vec<SimulatedUnit>,
    sequence: DeterministicSequence,
    today: NaiveDate,
}

impl OccupancySimulator {
    pub fn new(config: SimulationConfig, units: Vec<SimulatedUnit>) -> Self {
        let sequence = DeterministicSequence::new(config.seed);
        let today = config.start_date;
        Self {
            config,
            units,
            sequence,
            today,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn units(&self) -> &[SimulatedUnit] {
        &self.units
    }

    /// Advance the whole population by one day.
    pub fn tick(&mut self) -> TickSummary {
        self.today = self.today + Duration::days(1);
        let today = self.today;
        let mut summary = TickSummary::new(today);

        for unit in &mut self.units {
            let Some(profile) = self.config.profiles.get(&unit.floorplan).copied() else {
                summary.skipped_units += 1;
                continue;
            };

            match unit.status {
                OccupancyStatus::Occupied => {
                    if self.sequence.next_bool(profile.notice_daily) {
                        let notice = self.sequence.int_in_range(
                            self.config.notice_window_days.0,
                            self.config.notice_window_days.1,
                        );
                        unit.status = OccupancyStatus::OnNotice;
                        unit.lease_end = Some(today + Duration::days(notice));
                        summary.notices += 1;
                    }
                }
                OccupancyStatus::OnNotice => {
                    if unit.lease_end.is_some_and(|end| end <= today) {
                        unit.status = OccupancyStatus::VacantNotReady;
                        unit.lease_end = None;
                        unit.vacant_days = 0;
                        summary.move_outs += 1;
                    } else if self.sequence.next_bool(profile.prelease_daily) {
                        let gap = self.sequence.int_in_range(
                            self.config.turnover_window_days.0,
                            self.config.turnover_window_days.1,
                        );
                        let lease_end = unit.lease_end.unwrap_or(today);
                        unit.status = OccupancyStatus::OnNoticeRented;
                        unit.prelease_start = Some(lease_end + Duration::days(gap));
                        summary.preleases += 1;
                    }
                }
                OccupancyStatus::OnNoticeRented => {
                    if unit.lease_end.is_some_and(|end| end <= today) {
                        unit.status = OccupancyStatus::VacantReady;
                        unit.lease_end = None;
                        unit.vacant_days = 0;
                        summary.move_outs += 1;
                    }
                }
                OccupancyStatus::VacantNotReady => {
                    if self.sequence.next_bool(profile.make_ready_daily) {
                        unit.status = OccupancyStatus::VacantReady;
                        summary.made_ready += 1;
                    } else {
                        unit.vacant_days += 1;
                    }
                }
                OccupancyStatus::VacantReady => {
                    if unit.prelease_start.is_some() {
                        // Incoming tenant already signed while the prior
                        // tenant was on notice; park until the start date.
                        unit.status = OccupancyStatus::Preleased;
                    } else {
                        let probability =
                            (0.05 + self.sequence.next_fraction() * 0.10).min(0.5);
                        if self.sequence.next_bool(probability) {
                            Self::move_in(unit, today);
                            summary.move_ins += 1;
                        } else {
                            unit.vacant_days += 1;
                        }
                    }
                }
                OccupancyStatus::Preleased => {
                    if unit.prelease_start.is_some_and(|start| start <= today) {
                        Self::move_in(unit, today);
                        summary.move_ins += 1;
                    }
                }
                // Terminal until externally cleared.
                OccupancyStatus::Offline => {}
            }
        }

        summary
    }

    // New 12-month lease starting today.
    fn move_in(unit: &mut SimulatedUnit, today: NaiveDate) {
        unit.status = OccupancyStatus::Occupied;
        unit.lease_end = Some(today + Months::new(12));
        unit.prelease_start = None;
        unit.vacant_days = 0;
    }

    /// Take a unit out of service, or restore it to the turnover queue.
    pub fn set_offline(&mut self, unit_id: &str, offline: bool) -> Result<(), SimulationError> {
        let unit = self
            .units
            .iter_mut()
            .find(|unit| unit.unit_id == unit_id)
            .ok_or_else(|| SimulationError::UnknownUnit(unit_id.to_string()))?;

        if offline {
            unit.status = OccupancyStatus::Offline;
            unit.lease_end = None;
            unit.prelease_start = None;
            unit.vacant_days = 0;
        } else if unit.status == OccupancyStatus::Offline {
            unit.status = OccupancyStatus::VacantNotReady;
        }

        Ok(())
    }

    pub fn occupancy_by_floorplan(&self) -> BTreeMap<String, OccupancyCensus> {
        let mut census: BTreeMap<String, OccupancyCensus> = BTreeMap::new();
        for unit in &self.units {
            let entry = census.entry(unit.floorplan.clone()).or_default();
            if !unit.status.in_service() {
                continue;
            }
            entry.total += 1;
            if unit.status.counts_as_current() {
                entry.current += 1;
            }
            if unit.status.counts_as_trending() {
                entry.trending += 1;
            }
        }
        census
    }

    pub fn community_census(&self) -> OccupancyCensus {
        let mut community = OccupancyCensus::default();
        for census in self.occupancy_by_floorplan().values() {
            community.total += census.total;
            community.current += census.current;
            community.trending += census.trending;
        }
        community
    }

    /// Bridge the synthetic population into engine input snapshots.
    pub fn unit_states(&self) -> Vec<UnitState> {
        self.units
            .iter()
            .map(|unit| UnitState {
                unit_id: unit.unit_id.clone(),
                floorplan: unit.floorplan.clone(),
                floorplan_label: self.floorplan_label(&unit.floorplan),
                status: unit.status,
                current_rent: unit.rent,
                vacant_days: unit.vacant_days,
                amenity_adjustment: 0.0,
                move_out: unit.lease_end,
                available_on: unit.prelease_start,
            })
            .collect()
    }

    /// Bridge the census into per-floorplan trend records using the pricing
    /// config's comfort bands and the profiles' bedroom counts.
    pub fn floorplan_trends(&self, pricing: &PricingConfig) -> Vec<FloorplanTrend> {
        self.occupancy_by_floorplan()
            .into_iter()
            .map(|(floorplan, census)| {
                let bedrooms = self
                    .config
                    .profiles
                    .get(&floorplan)
                    .map(|profile| profile.bedrooms)
                    .unwrap_or(0);
                FloorplanTrend {
                    comfort_band: pricing.comfort_band_for(&floorplan),
                    trending_occupancy: census.trending_rate(),
                    current_occupancy: census.current_rate(),
                    floorplan,
                    bedrooms,
                }
            })
            .collect()
    }

    pub fn community_metrics(&self, target_occupancy: f64) -> CommunityMetrics {
        let census = self.community_census();
        CommunityMetrics {
            trending_occupancy: census.trending_rate(),
            current_occupancy: census.current_rate(),
            target_occupancy,
        }
    }

    fn floorplan_label(&self, floorplan: &str) -> String {
        match self.config.profiles.get(floorplan) {
            Some(profile) if profile.bedrooms == 0 => format!("{floorplan} Studio"),
            Some(profile) => format!("{floorplan} {}BR", profile.bedrooms),
            None => floorplan.to_string(),
        }
    }
}
