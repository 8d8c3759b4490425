use std::collections::BTreeMap;

use super::common::{
    band, config, context_with_trend, conversion, engine, evaluation_date, neutral_community,
    trend, unit,
};
use crate::workflows::pricing::{
    CarryForwardBaseline, FloorplanPolicy, PriceDirection, PricingConfig, PricingContext,
    PricingEngine, PricingError, PricingFlag, ReasonKind, SensitivityTier,
};

fn carry(unit_id: &str, floorplan: &str, baseline: f64) -> CarryForwardBaseline {
    CarryForwardBaseline {
        unit_id: unit_id.to_string(),
        floorplan: floorplan.to_string(),
        baseline,
        approved_on: evaluation_date(),
        reference_term: 12,
    }
}

#[test]
fn collapsed_occupancy_clamps_to_the_decrease_cap() {
    // Current rent 1500, trending 75% against a 93-96% band, 5% cap: the
    // saturated downward move must clamp to exactly 1425.
    let engine = engine();
    let context = context_with_trend(trend("A1", 0.75, band(), 1));
    let subject = unit("101", "A1", 1_500.0);

    let result = engine
        .price_unit(&subject, &context, None)
        .expect("unit prices");

    assert_eq!(result.baseline, 1_425.0);
    assert_eq!(result.delta.direction, PriceDirection::Decrease);
    assert!(result.flags.contains(&PricingFlag::Decrease));
    assert!(result
        .reasons
        .iter()
        .any(|reason| reason.kind == ReasonKind::DecreaseCap && reason.applied));
}

#[test]
fn strong_conversion_inside_band_nudges_up_half_a_percent() {
    let engine = engine();
    let mut context = context_with_trend(trend("A1", 0.94, band(), 1));
    context
        .conversions
        .insert("A1".to_string(), conversion(100, 35));
    let subject = unit("101", "A1", 1_500.0);

    let result = engine
        .price_unit(&subject, &context, None)
        .expect("unit prices");

    assert!((result.baseline - 1_507.5).abs() < 1e-9);
    assert!(result
        .reasons
        .iter()
        .any(|reason| reason.kind == ReasonKind::ConversionNudge && reason.applied));
}

#[test]
fn over_cap_term_with_seasonality_prices_additively() {
    // Baseline 1000 with an 11-month over-cap of 12% and a 2% seasonal
    // uplift for the lease-end month prices 11 months at exactly 1140.
    let mut config = config();
    config.over_cap_premiums = BTreeMap::from([(11, 0.12)]);
    config.seasonality.monthly = [0.02; 12];
    let engine = PricingEngine::new(config).expect("config valid");

    let mut context = context_with_trend(trend("A1", 0.94, band(), 1));
    context
        .carry_forward
        .insert("101".to_string(), carry("101", "A1", 1_000.0));
    let subject = unit("101", "A1", 1_000.0);

    let result = engine
        .price_unit(&subject, &context, None)
        .expect("unit prices");

    assert_eq!(result.baseline, 1_000.0);
    let eleven = result.term_price(11).expect("11-month entry");
    assert_eq!(eleven.price, 1_140.0);
}

#[test]
fn repeated_calls_are_bit_identical() {
    let engine = engine();
    let mut context = context_with_trend(trend("A1", 0.89, band(), 1));
    context
        .conversions
        .insert("A1".to_string(), conversion(40, 9));
    let subject = unit("101", "A1", 1_375.0);

    let first = engine
        .price_unit(&subject, &context, None)
        .expect("unit prices");
    let second = engine
        .price_unit(&subject, &context, None)
        .expect("unit prices");

    assert_eq!(first, second);
}

#[test]
fn carry_forward_baseline_outranks_current_rent() {
    let engine = engine();
    let mut context = context_with_trend(trend("A1", 0.94, band(), 1));
    context
        .carry_forward
        .insert("101".to_string(), carry("101", "A1", 1_480.0));
    let subject = unit("101", "A1", 1_500.0);

    let result = engine
        .price_unit(&subject, &context, None)
        .expect("unit prices");

    assert_eq!(result.delta.starting_point, 1_480.0);
    assert!(result.flags.contains(&PricingFlag::CarryForwardApplied));
    assert!(result
        .reasons
        .iter()
        .any(|reason| reason.kind == ReasonKind::CarryForward && reason.applied));
}

#[test]
fn carry_forward_flag_off_reverts_to_current_rent() {
    let mut config = config();
    config.features.carry_forward = false;
    let engine = PricingEngine::new(config).expect("config valid");

    let mut context = context_with_trend(trend("A1", 0.94, band(), 1));
    context
        .carry_forward
        .insert("101".to_string(), carry("101", "A1", 1_480.0));
    let subject = unit("101", "A1", 1_500.0);

    let result = engine
        .price_unit(&subject, &context, None)
        .expect("unit prices");

    assert_eq!(result.delta.starting_point, 1_500.0);
    assert!(!result.flags.contains(&PricingFlag::CarryForwardApplied));
}

#[test]
fn seed_rent_backfills_units_without_rent() {
    let engine = engine();
    let mut context = context_with_trend(trend("A1", 0.94, band(), 1));
    context.seed_rents.insert("A1".to_string(), 1_295.0);
    let mut subject = unit("101", "A1", 0.0);
    subject.current_rent = 0.0;

    let result = engine
        .price_unit(&subject, &context, None)
        .expect("unit prices");

    assert_eq!(result.delta.starting_point, 1_295.0);
    assert!(result.flags.contains(&PricingFlag::SeedRentApplied));
}

#[test]
fn missing_trend_degrades_to_a_hold() {
    let engine = engine();
    let context = PricingContext::new(evaluation_date(), neutral_community());
    let subject = unit("101", "A1", 1_500.0);

    let result = engine
        .price_unit(&subject, &context, None)
        .expect("unit prices");

    assert_eq!(result.baseline, 1_500.0);
    assert_eq!(result.delta.direction, PriceDirection::Hold);
    assert!(result.flags.contains(&PricingFlag::TrendMissing));
}

#[test]
fn manual_override_pins_the_candidate_but_keeps_guardrails() {
    let mut config = config();
    config.floorplan_policies.insert(
        "A1".to_string(),
        FloorplanPolicy {
            manual_baseline: Some(400.0),
            ..FloorplanPolicy::default()
        },
    );
    config.max_decrease_fraction = 1.0;
    let engine = PricingEngine::new(config).expect("config valid");

    let context = context_with_trend(trend("A1", 0.94, band(), 1));
    let subject = unit("101", "A1", 1_000.0);

    let result = engine
        .price_unit(&subject, &context, None)
        .expect("unit prices");

    // Pinned at 400, but the floor still holds at 900.
    assert_eq!(result.baseline, 900.0);
    assert!(result.flags.contains(&PricingFlag::ManualOverride));
    assert!(result
        .reasons
        .iter()
        .any(|reason| reason.kind == ReasonKind::RentFloor && reason.applied));
}

#[test]
fn invalid_term_lists_fail_at_construction() {
    let mut empty = config();
    empty.terms.clear();
    assert!(matches!(
        PricingEngine::new(empty),
        Err(PricingError::InvalidTerms(_))
    ));

    let mut zero = config();
    zero.terms.push(0);
    assert!(matches!(
        PricingEngine::new(zero),
        Err(PricingError::InvalidTerms(_))
    ));

    let mut orphan_reference = config();
    orphan_reference.reference_term = 18;
    assert!(matches!(
        PricingEngine::new(orphan_reference),
        Err(PricingError::InvalidTerms(_))
    ));
}

#[test]
fn gap_policy_without_lower_reference_is_an_ordering_violation() {
    let mut config = config();
    config.floorplan_policies.insert(
        "B2".to_string(),
        FloorplanPolicy {
            min_gap_to_lower_tier: Some(150.0),
            ..FloorplanPolicy::default()
        },
    );
    let engine = PricingEngine::new(config).expect("config valid");

    let context = context_with_trend(trend("B2", 0.94, band(), 2));
    let subject = unit("201", "B2", 1_650.0);

    let error = engine
        .price_unit(&subject, &context, None)
        .expect_err("lower tier missing");
    assert!(matches!(
        error,
        PricingError::TierOrderingViolation { floorplan } if floorplan == "B2"
    ));
}

#[test]
fn portfolio_prices_tiers_ascending_and_enforces_spacing() {
    let mut config = config();
    config.floorplan_policies.insert(
        "B2".to_string(),
        FloorplanPolicy {
            min_gap_to_lower_tier: Some(150.0),
            ..FloorplanPolicy::default()
        },
    );
    let engine = PricingEngine::new(config).expect("config valid");

    let mut context = PricingContext::new(evaluation_date(), neutral_community());
    // The two-bedroom tier is soft while the one-bedroom tier is healthy:
    // without spacing, B2 would sag toward A1.
    context
        .trends
        .insert("A1".to_string(), trend("A1", 0.94, band(), 1));
    context
        .trends
        .insert("B2".to_string(), trend("B2", 0.80, band(), 2));

    let units = vec![
        unit("201", "B2", 1_500.0),
        unit("101", "A1", 1_450.0),
        unit("102", "A1", 1_450.0),
    ];

    let portfolio = engine
        .price_portfolio(&units, &context)
        .expect("portfolio prices");

    let order: Vec<&str> = portfolio
        .floorplans
        .iter()
        .map(|plan| plan.floorplan.as_str())
        .collect();
    assert_eq!(order, vec!["A1", "B2"]);

    let a1 = portfolio.floorplan("A1").expect("A1 priced");
    let b2 = portfolio.floorplan("B2").expect("B2 priced");
    assert!(
        b2.reference_rent >= a1.reference_rent + 150.0 - 1.0,
        "B2 reference {} must clear A1 reference {} by the gap",
        b2.reference_rent,
        a1.reference_rent
    );
    assert!(b2.units.iter().any(|result| result
        .reasons
        .iter()
        .any(|reason| reason.kind == ReasonKind::TierSpacing && reason.applied)));
}

#[test]
fn portfolio_skips_offline_units() {
    let engine = engine();
    let context = context_with_trend(trend("A1", 0.94, band(), 1));

    let mut offline = unit("103", "A1", 1_450.0);
    offline.status = crate::workflows::pricing::OccupancyStatus::Offline;
    let units = vec![unit("101", "A1", 1_450.0), offline];

    let portfolio = engine
        .price_portfolio(&units, &context)
        .expect("portfolio prices");

    let a1 = portfolio.floorplan("A1").expect("A1 priced");
    assert_eq!(a1.units.len(), 1);
    assert_eq!(a1.units[0].unit_id, "101");
}

#[test]
fn finalized_baseline_always_respects_the_floor() {
    let engine = engine();
    let occupancies = [0.50, 0.70, 0.85, 0.90, 0.93, 0.95, 0.99];

    for occupancy in occupancies {
        let context = context_with_trend(trend("A1", occupancy, band(), 1));
        let subject = unit("101", "A1", 1_200.0);
        let result = engine
            .price_unit(&subject, &context, None)
            .expect("unit prices");

        let floor = (1_200.0f64 * 0.90).max(500.0);
        assert!(
            result.baseline >= floor,
            "occupancy {occupancy}: baseline {} under floor {floor}",
            result.baseline
        );

        // And the decrease never exceeds the directional cap.
        let drop = (1_200.0 - result.baseline).max(0.0);
        assert!(drop / 1_200.0 <= 0.05 + 1e-12);
    }
}

#[test]
fn gentle_tier_moves_less_than_assertive() {
    let context = context_with_trend(trend("A1", 0.80, band(), 1));
    let subject = unit("101", "A1", 1_500.0);

    let mut gentle_config = config();
    gentle_config.sensitivity = SensitivityTier::Gentle;
    let gentle = PricingEngine::new(gentle_config)
        .expect("config valid")
        .price_unit(&subject, &context, None)
        .expect("unit prices");

    let assertive = engine()
        .price_unit(&subject, &context, None)
        .expect("unit prices");

    assert!(gentle.baseline > assertive.baseline);
}

#[test]
fn delta_block_tracks_the_starting_point() {
    let engine = engine();
    let context = context_with_trend(trend("A1", 0.75, band(), 1));
    let subject = unit("101", "A1", 1_500.0);

    let result = engine
        .price_unit(&subject, &context, None)
        .expect("unit prices");

    assert_eq!(result.delta.starting_point, 1_500.0);
    assert_eq!(result.delta.amount, -75.0);
    assert!((result.delta.percent + 5.0).abs() < 1e-9);
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn engine_is_shareable_across_threads() {
    assert_send_sync::<PricingEngine>();
    assert_send_sync::<PricingConfig>();
    assert_send_sync::<PricingContext>();
}
