use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Pipeline stage that produced (or declined to produce) an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    CarryForward,
    SeedRent,
    ManualOverride,
    TrendMovement,
    ConversionNudge,
    CommunityBias,
    DecreaseCap,
    RentFloor,
    DecreaseBuffer,
    TierSpacing,
}

impl ReasonKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CarryForward => "Carry-Forward Baseline",
            Self::SeedRent => "Seed Rent",
            Self::ManualOverride => "Manual Override",
            Self::TrendMovement => "Trend Movement",
            Self::ConversionNudge => "Conversion Nudge",
            Self::CommunityBias => "Community Bias",
            Self::DecreaseCap => "Decrease Cap",
            Self::RentFloor => "Rent Floor",
            Self::DecreaseBuffer => "Stop-Decrease Buffer",
            Self::TierSpacing => "Tier Spacing",
        }
    }
}

/// One audit entry per pipeline stage, in the order the stages ran. A clamp
/// that fires is never silent; a stage that was considered and held is
/// recorded with `applied: false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingReason {
    pub kind: ReasonKind,
    pub applied: bool,
    pub detail: String,
}

impl PricingReason {
    pub(crate) fn applied(kind: ReasonKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            applied: true,
            detail: detail.into(),
        }
    }

    pub(crate) fn held(kind: ReasonKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            applied: false,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceDirection {
    Increase,
    Decrease,
    Hold,
}

impl PriceDirection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Increase => "Increase",
            Self::Decrease => "Decrease",
            Self::Hold => "Hold",
        }
    }
}

/// Change between the run's starting point and the finalized baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceDelta {
    pub starting_point: f64,
    pub amount: f64,
    pub percent: f64,
    pub direction: PriceDirection,
}

impl PriceDelta {
    pub(crate) fn between(starting_point: f64, finalized: f64) -> Self {
        let amount = finalized - starting_point;
        let percent = if starting_point > 0.0 {
            amount / starting_point * 100.0
        } else {
            0.0
        };
        let direction = if amount > 0.005 {
            PriceDirection::Increase
        } else if amount < -0.005 {
            PriceDirection::Decrease
        } else {
            PriceDirection::Hold
        };

        Self {
            starting_point,
            amount,
            percent,
            direction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingFlag {
    Increase,
    Decrease,
    Hold,
    CarryForwardApplied,
    SeedRentApplied,
    ManualOverride,
    TrendMissing,
    VacancyAged,
}

impl PricingFlag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Increase => "Increase",
            Self::Decrease => "Decrease",
            Self::Hold => "Hold",
            Self::CarryForwardApplied => "Carry-Forward Applied",
            Self::SeedRentApplied => "Seed Rent Applied",
            Self::ManualOverride => "Manual Override",
            Self::TrendMissing => "Trend Missing",
            Self::VacancyAged => "Vacancy Aged",
        }
    }

    pub(crate) const fn for_direction(direction: PriceDirection) -> Self {
        match direction {
            PriceDirection::Increase => Self::Increase,
            PriceDirection::Decrease => Self::Decrease,
            PriceDirection::Hold => Self::Hold,
        }
    }
}

/// One row of the published term menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermPrice {
    pub term: u32,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Finalized recommendation for one unit. Created fresh per invocation and
/// never mutated after return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPricingResult {
    pub unit_id: String,
    pub floorplan: String,
    pub baseline: f64,
    pub reference_rent: f64,
    pub term_prices: Vec<TermPrice>,
    pub delta: PriceDelta,
    pub flags: Vec<PricingFlag>,
    pub reasons: Vec<PricingReason>,
}

impl UnitPricingResult {
    pub fn term_price(&self, term: u32) -> Option<&TermPrice> {
        self.term_prices.iter().find(|entry| entry.term == term)
    }

    /// Reasons that actually moved or clamped the price, in pipeline order.
    pub fn applied_reasons(&self) -> impl Iterator<Item = &PricingReason> {
        self.reasons.iter().filter(|reason| reason.applied)
    }
}

/// All units of one floorplan plus the floorplan's reference rent (mean of
/// the unit reference rents), which anchors the next tier's spacing check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorplanPricing {
    pub floorplan: String,
    pub reference_rent: f64,
    pub units: Vec<UnitPricingResult>,
}

/// Portfolio run output, floorplans in ascending tier order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPricing {
    pub evaluation_date: NaiveDate,
    pub floorplans: Vec<FloorplanPricing>,
}

impl PortfolioPricing {
    pub fn unit_results(&self) -> impl Iterator<Item = &UnitPricingResult> {
        self.floorplans.iter().flat_map(|plan| plan.units.iter())
    }

    pub fn floorplan(&self, code: &str) -> Option<&FloorplanPricing> {
        self.floorplans.iter().find(|plan| plan.floorplan == code)
    }
}
