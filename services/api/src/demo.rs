use crate::infra::{
    context_from_rent_roll, context_from_simulator, default_pricing_config, demo_simulation,
    parse_date, InMemoryCarryForwardStore,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use revenue_ai::error::AppError;
use revenue_ai::workflows::pricing::{
    baselines_from_portfolio, CarryForwardStore, PortfolioPricing, PricingEngine,
};
use revenue_ai::workflows::rentroll::RentRollImporter;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PriceArgs {
    /// Rent-roll CSV to price; omit to price a simulated portfolio
    #[arg(long)]
    pub(crate) rent_roll: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Seed for the simulated portfolio fallback
    #[arg(long, default_value_t = 2_024)]
    pub(crate) seed: u32,
    /// Simulated warm-up days before pricing the synthetic portfolio
    #[arg(long, default_value_t = 45)]
    pub(crate) warmup_days: u32,
    /// Emit the full result payload as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Sequence seed; the same seed always replays the same trajectory
    #[arg(long, default_value_t = 2_024)]
    pub(crate) seed: u32,
    /// Number of days to simulate
    #[arg(long, default_value_t = 90)]
    pub(crate) days: u32,
    /// Simulation start date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Sequence seed for the synthetic portfolio
    #[arg(long, default_value_t = 2_024)]
    pub(crate) seed: u32,
    /// Days of occupancy churn before the first pricing run
    #[arg(long, default_value_t = 60)]
    pub(crate) warmup_days: u32,
    /// Consecutive daily pricing runs with carry-forward feedback
    #[arg(long, default_value_t = 7)]
    pub(crate) pricing_days: u32,
}

pub(crate) fn run_price(args: PriceArgs) -> Result<(), AppError> {
    let PriceArgs {
        rent_roll,
        as_of,
        seed,
        warmup_days,
        json,
    } = args;

    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let pricing_config = default_pricing_config();
    let engine = PricingEngine::new(pricing_config.clone())?;

    let (units, context, source) = match rent_roll {
        Some(path) => {
            let units = RentRollImporter::from_path(path, as_of)?;
            let context = context_from_rent_roll(&units, as_of, &pricing_config);
            (units, context, "rent roll")
        }
        None => {
            let mut simulator = demo_simulation(seed, as_of - chrono::Duration::days(i64::from(warmup_days)));
            for _ in 0..warmup_days {
                simulator.tick();
            }
            let units = simulator.unit_states();
            let context = context_from_simulator(&simulator, &pricing_config);
            (units, context, "simulation")
        }
    };

    let portfolio = engine.price_portfolio(&units, &context)?;

    if json {
        match serde_json::to_string_pretty(&portfolio) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("result payload unavailable: {err}"),
        }
    } else {
        println!(
            "Pricing run ({source}) as of {} - {} units across {} floorplans",
            context.evaluation_date,
            units.len(),
            portfolio.floorplans.len()
        );
        render_portfolio(&portfolio);
    }

    Ok(())
}

pub(crate) fn run_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let SimulateArgs {
        seed,
        days,
        start_date,
    } = args;

    let start_date = start_date.unwrap_or_else(|| Local::now().date_naive());
    let mut simulator = demo_simulation(seed, start_date);

    println!("Occupancy simulation: seed {seed}, {days} days from {start_date}");
    for _ in 0..days {
        let summary = simulator.tick();
        let census = simulator.community_census();
        println!(
            "{}: {} notices, {} preleases, {} move-outs, {} ready, {} move-ins | occupancy {:.1}% current / {:.1}% trending",
            summary.date,
            summary.notices,
            summary.preleases,
            summary.move_outs,
            summary.made_ready,
            summary.move_ins,
            census.current_rate() * 100.0,
            census.trending_rate() * 100.0,
        );
        if summary.skipped_units > 0 {
            println!(
                "  warning: {} units skipped (no floorplan profile)",
                summary.skipped_units
            );
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        seed,
        warmup_days,
        pricing_days,
    } = args;

    let start = Local::now().date_naive() - chrono::Duration::days(i64::from(warmup_days));
    let pricing_config = default_pricing_config();
    let engine = PricingEngine::new(pricing_config.clone())?;
    let store = InMemoryCarryForwardStore::default();

    println!("Revenue pricing demo: seed {seed}, {warmup_days} warm-up days, {pricing_days} pricing days");

    let mut simulator = demo_simulation(seed, start);
    for _ in 0..warmup_days {
        simulator.tick();
    }

    let mut last_portfolio = None;
    for day in 1..=pricing_days {
        simulator.tick();

        let mut context = context_from_simulator(&simulator, &pricing_config);
        context.carry_forward = store.fetch_all()?;

        let units = simulator.unit_states();
        let portfolio = engine.price_portfolio(&units, &context)?;
        store.record(&baselines_from_portfolio(
            &portfolio,
            context.evaluation_date,
            pricing_config.reference_term,
        ))?;

        let census = simulator.community_census();
        println!(
            "\nDay {day} ({}): occupancy {:.1}% current / {:.1}% trending",
            context.evaluation_date,
            census.current_rate() * 100.0,
            census.trending_rate() * 100.0,
        );
        for plan in &portfolio.floorplans {
            let moved = plan
                .units
                .iter()
                .filter(|result| result.delta.amount.abs() > 0.005)
                .count();
            println!(
                "  {}: reference ${:.0}, {} of {} units moved",
                plan.floorplan,
                plan.reference_rent,
                moved,
                plan.units.len()
            );
        }

        last_portfolio = Some(portfolio);
    }

    if let Some(portfolio) = last_portfolio {
        println!("\nFinal run detail");
        render_portfolio(&portfolio);

        if let Some(result) = portfolio.unit_results().next() {
            match serde_json::to_string_pretty(result) {
                Ok(payload) => println!("\nSample result payload:\n{payload}"),
                Err(err) => println!("\nSample result payload unavailable: {err}"),
            }
        }
    }

    Ok(())
}

fn render_portfolio(portfolio: &PortfolioPricing) {
    for plan in &portfolio.floorplans {
        println!(
            "- {} (reference ${:.0})",
            plan.floorplan, plan.reference_rent
        );
        for result in &plan.units {
            println!(
                "    {}: baseline ${:.2} ({} {:+.2}%)",
                result.unit_id,
                result.baseline,
                result.delta.direction.label(),
                result.delta.percent
            );
            for reason in result.applied_reasons() {
                println!("      * {}: {}", reason.kind.label(), reason.detail);
            }
        }
    }
}
