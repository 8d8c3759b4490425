use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::ComfortBand;

/// How hard pricing leans into an occupancy deviation. Each tier fixes the
/// ceiling of a single run's directional move and the steepness of the tanh
/// response inside that ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityTier {
    Gentle,
    Standard,
    Assertive,
}

impl SensitivityTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gentle => "Gentle",
            Self::Standard => "Standard",
            Self::Assertive => "Assertive",
        }
    }

    /// Largest movement a single run may propose before guardrails.
    pub const fn max_move(self) -> f64 {
        match self {
            Self::Gentle => 0.03,
            Self::Standard => 0.05,
            Self::Assertive => 0.08,
        }
    }

    pub const fn steepness(self) -> f64 {
        match self {
            Self::Gentle => 0.8,
            Self::Standard => 1.1,
            Self::Assertive => 1.4,
        }
    }
}

/// Per-floorplan policy overrides layered on top of the portfolio defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorplanPolicy {
    /// Minimum dollar spacing above the next lower tier's reference rent.
    pub min_gap_to_lower_tier: Option<f64>,
    /// Never drop more than this many dollars below the prior approved
    /// baseline in one run.
    pub stop_decrease_buffer: Option<f64>,
    /// Manager-pinned baseline; replaces the movement-derived candidate but
    /// still passes through the guardrails.
    pub manual_baseline: Option<f64>,
    pub comfort_band: Option<ComfortBand>,
}

/// Premium taper for short lease terms: `start_fraction` at the shortest
/// configured term, shrinking by `taper_per_month`, zero at and beyond
/// `cutoff_month`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShortTermPremium {
    pub start_fraction: f64,
    pub taper_per_month: f64,
    pub cutoff_month: u32,
}

/// Growing concession for units that have sat vacant past a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VacancyAgeDiscount {
    pub enabled: bool,
    pub per_day_rate: f64,
    pub max_fraction: f64,
    pub threshold_days: u32,
}

impl VacancyAgeDiscount {
    pub fn fraction_for(&self, vacant_days: u32) -> f64 {
        if !self.enabled || vacant_days <= self.threshold_days {
            return 0.0;
        }
        let days_over = f64::from(vacant_days - self.threshold_days);
        (days_over * self.per_day_rate).min(self.max_fraction)
    }
}

/// Month-of-year uplift applied to over-cap terms whose lease would end in a
/// favorable month. Entries are fractions; non-positive entries never apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityTable {
    pub enabled: bool,
    pub monthly: [f64; 12],
}

impl SeasonalityTable {
    /// Uplift for a zero-based month index, or 0.0 when disabled/negative.
    pub fn uplift_for_month(&self, month0: usize) -> f64 {
        if !self.enabled {
            return 0.0;
        }
        let value = self.monthly[month0 % 12];
        if value > 0.0 {
            value
        } else {
            0.0
        }
    }
}

/// Inside-band steering from the lead-to-application funnel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionSteering {
    pub strong_threshold: f64,
    pub weak_threshold: f64,
    pub nudge: f64,
    pub lookback_days: u32,
}

/// Amplification of a floorplan move when the whole community leans the same
/// way. Kept configurable: the observed production constants ship as the
/// defaults, but the business rationale behind them is still unconfirmed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommunityBiasPolicy {
    pub agreement_threshold_points: f64,
    pub ramp_per_point: f64,
    pub max_amplification: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Start runs from prior approved baselines instead of seed rents.
    pub carry_forward: bool,
    /// Let the service layer source context from the occupancy simulator.
    pub simulation_source: bool,
}

/// Immutable policy knobs for one pricing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub sensitivity: SensitivityTier,
    pub comfort_band: ComfortBand,
    pub target_occupancy: f64,
    /// Directional cap: largest allowed one-run decrease as a fraction of
    /// the starting point. Increases are not capped here.
    pub max_decrease_fraction: f64,
    /// Floor as a fraction of current rent, paired with an absolute floor.
    pub floor_fraction: f64,
    pub absolute_floor: f64,
    pub reference_term: u32,
    pub terms: Vec<u32>,
    pub short_term_premium: ShortTermPremium,
    /// Elevated premium for specific long terms, keyed by term months.
    pub over_cap_premiums: BTreeMap<u32, f64>,
    pub seasonality: SeasonalityTable,
    pub vacancy_discount: VacancyAgeDiscount,
    pub conversion: ConversionSteering,
    pub community_bias: CommunityBiasPolicy,
    pub floorplan_policies: BTreeMap<String, FloorplanPolicy>,
    pub features: FeatureFlags,
}

impl PricingConfig {
    /// Production-shaped defaults: 2-14 month menu anchored on 12 months,
    /// 93-96% comfort band, 5% decrease cap, 8% short-term premium tapering
    /// out at 10 months.
    pub fn standard() -> Self {
        Self {
            sensitivity: SensitivityTier::Standard,
            comfort_band: ComfortBand {
                low: 0.93,
                high: 0.96,
            },
            target_occupancy: 0.945,
            max_decrease_fraction: 0.05,
            floor_fraction: 0.90,
            absolute_floor: 500.0,
            reference_term: 12,
            terms: (2..=14).collect(),
            short_term_premium: ShortTermPremium {
                start_fraction: 0.08,
                taper_per_month: 0.01,
                cutoff_month: 10,
            },
            over_cap_premiums: BTreeMap::from([(13, 0.01), (14, 0.02)]),
            seasonality: SeasonalityTable {
                enabled: true,
                monthly: [
                    -0.01, -0.005, 0.0, 0.005, 0.01, 0.015, 0.015, 0.01, 0.005, 0.0, -0.005,
                    -0.01,
                ],
            },
            vacancy_discount: VacancyAgeDiscount {
                enabled: true,
                per_day_rate: 0.001,
                max_fraction: 0.05,
                threshold_days: 21,
            },
            conversion: ConversionSteering {
                strong_threshold: 0.30,
                weak_threshold: 0.15,
                nudge: 0.005,
                lookback_days: 14,
            },
            community_bias: CommunityBiasPolicy {
                agreement_threshold_points: 1.0,
                ramp_per_point: 0.10,
                max_amplification: 0.30,
            },
            floorplan_policies: BTreeMap::new(),
            features: FeatureFlags {
                carry_forward: true,
                simulation_source: false,
            },
        }
    }

    pub fn policy_for(&self, floorplan: &str) -> Option<&FloorplanPolicy> {
        self.floorplan_policies.get(floorplan)
    }

    /// Floorplan band override, falling back to the portfolio band.
    pub fn comfort_band_for(&self, floorplan: &str) -> ComfortBand {
        self.policy_for(floorplan)
            .and_then(|policy| policy.comfort_band)
            .unwrap_or(self.comfort_band)
    }

    pub fn shortest_term(&self) -> u32 {
        self.terms.iter().copied().min().unwrap_or(self.reference_term)
    }

    /// Short-term premium for a term, honoring the taper and cutoff.
    pub fn short_term_premium_for(&self, term: u32) -> f64 {
        if term >= self.short_term_premium.cutoff_month {
            return 0.0;
        }
        let months_out = f64::from(term.saturating_sub(self.shortest_term()));
        let premium = self.short_term_premium.start_fraction
            - months_out * self.short_term_premium.taper_per_month;
        premium.max(0.0)
    }

    pub fn over_cap_premium_for(&self, term: u32) -> f64 {
        self.over_cap_premiums.get(&term).copied().unwrap_or(0.0)
    }
}
