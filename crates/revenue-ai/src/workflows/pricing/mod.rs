//! Deterministic rent-pricing engine: trend-driven directional movement,
//! ordered guardrail clamping, and term-menu expansion, with carry-forward
//! baseline continuity across runs.
//!
//! Everything in here is a pure function of the supplied config and context.
//! The engine reads no clock, draws no randomness, and owns no storage.

mod config;
mod context;
mod domain;
mod engine;
mod guardrails;
mod movement;
mod result;
mod router;
mod store;
mod terms;

#[cfg(test)]
mod tests;

pub use config::{
    CommunityBiasPolicy, ConversionSteering, FeatureFlags, FloorplanPolicy, PricingConfig,
    SeasonalityTable, SensitivityTier, ShortTermPremium, VacancyAgeDiscount,
};
pub use context::{ConversionWindow, PricingContext};
pub use domain::{
    CarryForwardBaseline, ComfortBand, CommunityMetrics, FloorplanTrend, OccupancyStatus,
    UnitState,
};
pub use engine::{PricingEngine, PricingError};
pub use result::{
    FloorplanPricing, PortfolioPricing, PriceDelta, PriceDirection, PricingFlag, PricingReason,
    ReasonKind, TermPrice, UnitPricingResult,
};
pub use router::{pricing_router, RunPricingRequest, RunPricingResponse};
pub use store::{baselines_from_portfolio, CarryForwardStore, CarryForwardStoreError};
