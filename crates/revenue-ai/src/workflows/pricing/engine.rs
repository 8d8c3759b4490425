use std::collections::BTreeMap;

use super::config::PricingConfig;
use super::context::PricingContext;
use super::domain::UnitState;
use super::movement;
use super::result::{
    FloorplanPricing, PortfolioPricing, PriceDelta, PricingFlag, PricingReason, ReasonKind,
    UnitPricingResult,
};
use super::{guardrails, terms};

/// Contract violations that abort a run. Everything softer (missing trends,
/// missing carry-forward entries, missing seed rents) degrades gracefully
/// inside [`PricingEngine::price_unit`].
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("invalid term list: {0}")]
    InvalidTerms(String),
    #[error("floorplan {floorplan} requires a finalized lower tier before it can be priced")]
    TierOrderingViolation { floorplan: String },
}

/// Stateless pricing engine: pure functions over an immutable config.
/// Identical inputs always produce identical output; there is no clock,
/// no randomness, and no shared mutable state in here.
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    /// Validates the term policy up front; a bad term list is a programmer
    /// error, not a per-unit condition.
    pub fn new(config: PricingConfig) -> Result<Self, PricingError> {
        if config.terms.is_empty() {
            return Err(PricingError::InvalidTerms("term list is empty".to_string()));
        }
        if config.terms.iter().any(|&term| term == 0) {
            return Err(PricingError::InvalidTerms(
                "terms must be at least one month".to_string(),
            ));
        }
        if !config.terms.contains(&config.reference_term) {
            return Err(PricingError::InvalidTerms(format!(
                "reference term {} is not in the term list",
                config.reference_term
            )));
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Price a single unit. `lower_tier_reference` must carry the next lower
    /// tier's finalized reference rent whenever this unit's floorplan policy
    /// demands tier spacing.
    pub fn price_unit(
        &self,
        unit: &UnitState,
        context: &PricingContext,
        lower_tier_reference: Option<f64>,
    ) -> Result<UnitPricingResult, PricingError> {
        let policy = self.config.policy_for(&unit.floorplan);
        if policy
            .and_then(|policy| policy.min_gap_to_lower_tier)
            .is_some()
            && lower_tier_reference.is_none()
        {
            return Err(PricingError::TierOrderingViolation {
                floorplan: unit.floorplan.clone(),
            });
        }

        let mut reasons = Vec::new();
        let mut flags = Vec::new();

        let carry_forward = if self.config.features.carry_forward {
            context.carry_forward_for(&unit.unit_id)
        } else {
            None
        };

        let starting_point = if let Some(prior) = carry_forward {
            reasons.push(PricingReason::applied(
                ReasonKind::CarryForward,
                format!(
                    "starting from prior approved baseline ${:.2} ({})",
                    prior.baseline, prior.approved_on
                ),
            ));
            flags.push(PricingFlag::CarryForwardApplied);
            prior.baseline
        } else if unit.current_rent > 0.0 {
            unit.current_rent
        } else if let Some(seed) = context.seed_rent_for(&unit.floorplan) {
            reasons.push(PricingReason::applied(
                ReasonKind::SeedRent,
                format!("no current rent; starting from floorplan seed ${seed:.2}"),
            ));
            flags.push(PricingFlag::SeedRentApplied);
            seed
        } else {
            0.0
        };

        let outcome = movement::movement_for_floorplan(&unit.floorplan, &self.config, context);
        if outcome.trend_missing {
            flags.push(PricingFlag::TrendMissing);
        }
        reasons.extend(outcome.reasons);

        let candidate = match policy.and_then(|policy| policy.manual_baseline) {
            Some(manual) => {
                reasons.push(PricingReason::applied(
                    ReasonKind::ManualOverride,
                    format!("floorplan baseline pinned at ${manual:.2}; movement skipped"),
                ));
                flags.push(PricingFlag::ManualOverride);
                manual
            }
            None => starting_point * (1.0 + outcome.movement),
        };

        let (baseline, guard_reasons) = guardrails::enforce(
            candidate,
            starting_point,
            unit,
            &self.config,
            carry_forward,
            lower_tier_reference,
        );
        reasons.extend(guard_reasons);

        let expansion = terms::expand(baseline, unit, &self.config, context.evaluation_date);
        if expansion.vacancy_aged {
            flags.push(PricingFlag::VacancyAged);
        }

        let delta = PriceDelta::between(starting_point, baseline);
        let mut all_flags = vec![PricingFlag::for_direction(delta.direction)];
        all_flags.extend(flags);

        Ok(UnitPricingResult {
            unit_id: unit.unit_id.clone(),
            floorplan: unit.floorplan.clone(),
            baseline,
            reference_rent: expansion.reference_rent,
            term_prices: expansion.term_prices,
            delta,
            flags: all_flags,
            reasons,
        })
    }

    /// Price every in-service unit of one floorplan and derive the
    /// floorplan's reference rent (mean of the unit reference rents), which
    /// anchors the next tier's spacing check.
    pub fn price_floorplan(
        &self,
        floorplan: &str,
        units: &[UnitState],
        context: &PricingContext,
        lower_tier_reference: Option<f64>,
    ) -> Result<FloorplanPricing, PricingError> {
        let mut results = Vec::new();
        for unit in units
            .iter()
            .filter(|unit| unit.floorplan == floorplan && unit.status.in_service())
        {
            results.push(self.price_unit(unit, context, lower_tier_reference)?);
        }

        let reference_rent = if results.is_empty() {
            0.0
        } else {
            let total: f64 = results.iter().map(|result| result.reference_rent).sum();
            (total / results.len() as f64).round()
        };

        Ok(FloorplanPricing {
            floorplan: floorplan.to_string(),
            reference_rent,
            units: results,
        })
    }

    /// Price the whole portfolio in ascending tier order (bedrooms, then
    /// floorplan code), chaining each floorplan's reference rent into the
    /// next tier's spacing guardrail.
    pub fn price_portfolio(
        &self,
        units: &[UnitState],
        context: &PricingContext,
    ) -> Result<PortfolioPricing, PricingError> {
        let mut seen = BTreeMap::new();
        for unit in units {
            seen.entry(unit.floorplan.clone()).or_insert_with(|| {
                context
                    .trend_for(&unit.floorplan)
                    .map(|trend| trend.bedrooms)
                    .unwrap_or(0)
            });
        }
        let mut tier_order: Vec<(u8, String)> = seen
            .into_iter()
            .map(|(floorplan, bedrooms)| (bedrooms, floorplan))
            .collect();
        tier_order.sort();

        let mut floorplans = Vec::with_capacity(tier_order.len());
        let mut lower_reference: Option<f64> = None;
        for (_, floorplan) in tier_order {
            let priced = self.price_floorplan(&floorplan, units, context, lower_reference)?;
            if !priced.units.is_empty() {
                lower_reference = Some(priced.reference_rent);
            }
            floorplans.push(priced);
        }

        Ok(PortfolioPricing {
            evaluation_date: context.evaluation_date,
            floorplans,
        })
    }
}
