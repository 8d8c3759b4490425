use super::config::PricingConfig;
use super::domain::{CarryForwardBaseline, UnitState};
use super::result::{PricingReason, ReasonKind};

/// Ordered clamping pipeline. The order is fixed and non-negotiable:
/// decrease cap, then absolute floor, then stop-decrease buffer, then tier
/// spacing. Every stage is recorded whether or not it fired.
pub(crate) fn enforce(
    candidate: f64,
    starting_point: f64,
    unit: &UnitState,
    config: &PricingConfig,
    carry_forward: Option<&CarryForwardBaseline>,
    lower_tier_reference: Option<f64>,
) -> (f64, Vec<PricingReason>) {
    let mut value = candidate;
    let mut reasons = Vec::new();

    // 1. Directional cap: decreases only; increases pass untouched.
    let max_drop = starting_point * config.max_decrease_fraction;
    if value < starting_point && starting_point - value > max_drop {
        value = starting_point - max_drop;
        reasons.push(PricingReason::applied(
            ReasonKind::DecreaseCap,
            format!(
                "decrease of ${:.2} exceeds the {:.0}% cap; clamped to ${:.2}",
                starting_point - candidate,
                config.max_decrease_fraction * 100.0,
                value
            ),
        ));
    } else {
        reasons.push(PricingReason::held(
            ReasonKind::DecreaseCap,
            format!(
                "within the {:.0}% decrease cap",
                config.max_decrease_fraction * 100.0
            ),
        ));
    }

    // 2. Absolute floor.
    let floor = (unit.current_rent * config.floor_fraction).max(config.absolute_floor);
    if value < floor {
        reasons.push(PricingReason::applied(
            ReasonKind::RentFloor,
            format!("candidate ${value:.2} below floor ${floor:.2}; raised to the floor"),
        ));
        value = floor;
    } else {
        reasons.push(PricingReason::held(
            ReasonKind::RentFloor,
            format!("above floor ${floor:.2}"),
        ));
    }

    let policy = config.policy_for(&unit.floorplan);

    // 3. Stop-decrease buffer against the prior approved baseline.
    if let (Some(buffer), Some(prior)) = (
        policy.and_then(|policy| policy.stop_decrease_buffer),
        carry_forward,
    ) {
        let min_allowed = prior.baseline - buffer;
        if value < min_allowed {
            reasons.push(PricingReason::applied(
                ReasonKind::DecreaseBuffer,
                format!(
                    "candidate ${value:.2} more than ${buffer:.0} below prior baseline \
                     ${:.2}; raised to ${min_allowed:.2}",
                    prior.baseline
                ),
            ));
            value = min_allowed;
        } else {
            reasons.push(PricingReason::held(
                ReasonKind::DecreaseBuffer,
                format!("within ${buffer:.0} of prior baseline ${:.2}", prior.baseline),
            ));
        }
    }

    // 4. Tier spacing: only ever raises the candidate.
    if let (Some(gap), Some(lower_reference)) = (
        policy.and_then(|policy| policy.min_gap_to_lower_tier),
        lower_tier_reference,
    ) {
        let required = lower_reference + gap;
        if value < required {
            reasons.push(PricingReason::applied(
                ReasonKind::TierSpacing,
                format!(
                    "candidate ${value:.2} within ${gap:.0} of lower tier reference \
                     ${lower_reference:.2}; raised to ${required:.2}"
                ),
            ));
            value = required;
        } else {
            reasons.push(PricingReason::held(
                ReasonKind::TierSpacing,
                format!("clears lower tier reference ${lower_reference:.2} by at least ${gap:.0}"),
            ));
        }
    }

    (value, reasons)
}
