use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unit lifecycle states shared by the pricing engine's input snapshots and
/// the occupancy simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyStatus {
    Occupied,
    OnNotice,
    OnNoticeRented,
    VacantNotReady,
    VacantReady,
    Preleased,
    Offline,
}

impl OccupancyStatus {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Occupied,
            Self::OnNotice,
            Self::OnNoticeRented,
            Self::VacantNotReady,
            Self::VacantReady,
            Self::Preleased,
            Self::Offline,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Occupied => "Occupied",
            Self::OnNotice => "On Notice",
            Self::OnNoticeRented => "On Notice (Rented)",
            Self::VacantNotReady => "Vacant Not Ready",
            Self::VacantReady => "Vacant Ready",
            Self::Preleased => "Preleased",
            Self::Offline => "Offline",
        }
    }

    /// Tenant physically in place today.
    pub const fn counts_as_current(self) -> bool {
        matches!(self, Self::Occupied | Self::OnNotice | Self::OnNoticeRented)
    }

    /// Expected to be occupied once pending move-ins and move-outs settle.
    pub const fn counts_as_trending(self) -> bool {
        matches!(self, Self::Occupied | Self::OnNoticeRented | Self::Preleased)
    }

    /// Offline units drop out of every occupancy denominator.
    pub const fn in_service(self) -> bool {
        !matches!(self, Self::Offline)
    }
}

/// Read-only unit snapshot handed to the pricing engine. Owned by the
/// caller; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitState {
    pub unit_id: String,
    pub floorplan: String,
    pub floorplan_label: String,
    pub status: OccupancyStatus,
    pub current_rent: f64,
    pub vacant_days: u32,
    /// Flat dollar positioning for unit-specific amenities (view, floor,
    /// renovation package). Applied to every term price.
    pub amenity_adjustment: f64,
    pub move_out: Option<NaiveDate>,
    pub available_on: Option<NaiveDate>,
}

/// Occupancy range considered healthy for a floorplan, as fractions.
/// Pricing moves aggressively outside the band and only nudges inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComfortBand {
    pub low: f64,
    pub high: f64,
}

impl ComfortBand {
    pub fn midpoint(self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn contains(self, occupancy: f64) -> bool {
        occupancy >= self.low && occupancy <= self.high
    }
}

/// Per-floorplan occupancy trend supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorplanTrend {
    pub floorplan: String,
    pub trending_occupancy: f64,
    pub current_occupancy: f64,
    pub comfort_band: ComfortBand,
    /// Tier ordering key: floorplans are priced in ascending bedroom order.
    pub bedrooms: u8,
}

/// Portfolio-wide occupancy picture used for community-bias amplification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommunityMetrics {
    pub trending_occupancy: f64,
    pub current_occupancy: f64,
    pub target_occupancy: f64,
}

/// Previously approved baseline for a unit. Once present, it replaces the
/// seed rent as the starting point of the next run so recommendations never
/// snap back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarryForwardBaseline {
    pub unit_id: String,
    pub floorplan: String,
    pub baseline: f64,
    pub approved_on: NaiveDate,
    pub reference_term: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_midpoint_and_membership() {
        let band = ComfortBand {
            low: 0.93,
            high: 0.96,
        };

        assert!((band.midpoint() - 0.945).abs() < 1e-12);
        assert!(band.contains(0.93));
        assert!(band.contains(0.96));
        assert!(!band.contains(0.9299));
        assert!(!band.contains(0.9601));
    }

    #[test]
    fn status_classification_tracks_tenancy() {
        for status in OccupancyStatus::ordered() {
            match status {
                OccupancyStatus::Occupied => {
                    assert!(status.counts_as_current());
                    assert!(status.counts_as_trending());
                }
                OccupancyStatus::OnNotice => {
                    assert!(status.counts_as_current());
                    assert!(!status.counts_as_trending());
                }
                OccupancyStatus::OnNoticeRented => {
                    assert!(status.counts_as_current());
                    assert!(status.counts_as_trending());
                }
                OccupancyStatus::Preleased => {
                    assert!(!status.counts_as_current());
                    assert!(status.counts_as_trending());
                }
                OccupancyStatus::Offline => {
                    assert!(!status.in_service());
                }
                _ => {
                    assert!(!status.counts_as_current());
                    assert!(!status.counts_as_trending());
                }
            }
        }
    }
}
