use super::config::PricingConfig;
use super::context::PricingContext;
use super::result::{PricingReason, ReasonKind};

/// Deviations are normalized against a fixed five-point occupancy scale
/// before entering the tanh response.
const DEVIATION_SCALE_POINTS: f64 = 5.0;

pub(crate) struct MovementOutcome {
    /// Signed fractional movement to apply to the starting point.
    pub movement: f64,
    pub reasons: Vec<PricingReason>,
    pub trend_missing: bool,
}

/// Band-relative directional movement for one floorplan.
///
/// Outside the comfort band the trending deviation drives a tanh-bounded
/// move, optionally amplified when the community leans the same way. Inside
/// the band the primary movement collapses to zero and the lead-conversion
/// nudge takes over.
pub(crate) fn movement_for_floorplan(
    floorplan: &str,
    config: &PricingConfig,
    context: &PricingContext,
) -> MovementOutcome {
    let Some(trend) = context.trend_for(floorplan) else {
        return MovementOutcome {
            movement: 0.0,
            reasons: vec![PricingReason::held(
                ReasonKind::TrendMovement,
                format!("no occupancy trend for floorplan {floorplan}; holding baseline"),
            )],
            trend_missing: true,
        };
    };

    let band = trend.comfort_band;
    if band.contains(trend.trending_occupancy) {
        let (movement, reason) = conversion_nudge(floorplan, config, context);
        return MovementOutcome {
            movement,
            reasons: vec![
                PricingReason::held(
                    ReasonKind::TrendMovement,
                    format!(
                        "trending {:.1}% inside comfort band {:.0}%-{:.0}%; no directional move",
                        trend.trending_occupancy * 100.0,
                        band.low * 100.0,
                        band.high * 100.0
                    ),
                ),
                reason,
            ],
            trend_missing: false,
        };
    }

    let deviation_points = (trend.trending_occupancy - band.midpoint()) * 100.0;
    let normalized = deviation_points / DEVIATION_SCALE_POINTS;
    let tier = config.sensitivity;
    let magnitude = tier.max_move() * (tier.steepness() * normalized).tanh().abs();
    let mut movement = magnitude * deviation_points.signum();

    let mut reasons = vec![PricingReason::applied(
        ReasonKind::TrendMovement,
        format!(
            "trending {:.1}% vs band midpoint {:.1}%: {} move of {:.2}% ({} tier)",
            trend.trending_occupancy * 100.0,
            band.midpoint() * 100.0,
            if movement < 0.0 { "downward" } else { "upward" },
            movement.abs() * 100.0,
            tier.label()
        ),
    )];

    let bias = config.community_bias;
    let community_points =
        (context.community.trending_occupancy - context.community.target_occupancy) * 100.0;
    let agrees = community_points.signum() == movement.signum();
    if community_points.abs() >= bias.agreement_threshold_points && agrees {
        let amplification =
            (bias.ramp_per_point * community_points.abs()).min(bias.max_amplification);
        movement *= 1.0 + amplification;
        reasons.push(PricingReason::applied(
            ReasonKind::CommunityBias,
            format!(
                "community trending {:.1} points {} target in the same direction; \
                 amplifying move by {:.0}%",
                community_points.abs(),
                if community_points < 0.0 { "below" } else { "above" },
                amplification * 100.0
            ),
        ));
    } else {
        reasons.push(PricingReason::held(
            ReasonKind::CommunityBias,
            "community occupancy does not reinforce this move".to_string(),
        ));
    }

    MovementOutcome {
        movement,
        reasons,
        trend_missing: false,
    }
}

fn conversion_nudge(
    floorplan: &str,
    config: &PricingConfig,
    context: &PricingContext,
) -> (f64, PricingReason) {
    let steering = config.conversion;
    let Some(ratio) = context
        .conversion_for(floorplan)
        .and_then(|window| window.ratio())
    else {
        return (
            0.0,
            PricingReason::held(
                ReasonKind::ConversionNudge,
                format!(
                    "no lead activity in the last {} days; holding",
                    steering.lookback_days
                ),
            ),
        );
    };

    if ratio >= steering.strong_threshold {
        (
            steering.nudge,
            PricingReason::applied(
                ReasonKind::ConversionNudge,
                format!(
                    "conversion {:.0}% at or above strong threshold {:.0}%; nudging up {:.1}%",
                    ratio * 100.0,
                    steering.strong_threshold * 100.0,
                    steering.nudge * 100.0
                ),
            ),
        )
    } else if ratio <= steering.weak_threshold {
        (
            -steering.nudge,
            PricingReason::applied(
                ReasonKind::ConversionNudge,
                format!(
                    "conversion {:.0}% at or below weak threshold {:.0}%; nudging down {:.1}%",
                    ratio * 100.0,
                    steering.weak_threshold * 100.0,
                    steering.nudge * 100.0
                ),
            ),
        )
    } else {
        (
            0.0,
            PricingReason::held(
                ReasonKind::ConversionNudge,
                format!(
                    "conversion {:.0}% between thresholds; holding",
                    ratio * 100.0
                ),
            ),
        )
    }
}
