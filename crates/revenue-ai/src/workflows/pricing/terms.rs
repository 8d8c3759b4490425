use chrono::{Datelike, Months, NaiveDate};

use super::config::PricingConfig;
use super::domain::UnitState;
use super::result::TermPrice;

pub(crate) struct TermExpansion {
    pub term_prices: Vec<TermPrice>,
    pub reference_rent: f64,
    pub vacancy_aged: bool,
}

/// Expand one finalized baseline into the full per-term menu.
///
/// Premiums and uplifts are summed into a single factor, the vacancy-age
/// concession multiplies against it, the unit's amenity adjustment rides on
/// top, and the result is rounded exactly once per term.
pub(crate) fn expand(
    baseline: f64,
    unit: &UnitState,
    config: &PricingConfig,
    evaluation_date: NaiveDate,
) -> TermExpansion {
    let discount = config.vacancy_discount.fraction_for(unit.vacant_days);
    let mut term_prices = Vec::with_capacity(config.terms.len());
    let mut reference_rent = 0.0;

    for &term in &config.terms {
        let short_premium = config.short_term_premium_for(term);
        let over_cap = config.over_cap_premium_for(term);
        let seasonal = if over_cap > 0.0 {
            config
                .seasonality
                .uplift_for_month(lease_end_month0(evaluation_date, term))
        } else {
            0.0
        };

        let raw = baseline * (1.0 + short_premium + over_cap + seasonal) * (1.0 - discount)
            + unit.amenity_adjustment;
        let price = raw.round();

        if term == config.reference_term {
            reference_rent = price;
        }

        term_prices.push(TermPrice {
            term,
            price,
            note: describe(short_premium, over_cap, seasonal, discount),
        });
    }

    TermExpansion {
        term_prices,
        reference_rent,
        vacancy_aged: discount > 0.0,
    }
}

/// Zero-based month in which a lease signed on the evaluation date for the
/// given term would end.
fn lease_end_month0(evaluation_date: NaiveDate, term: u32) -> usize {
    let lease_end = evaluation_date + Months::new(term);
    lease_end.month0() as usize
}

fn describe(short_premium: f64, over_cap: f64, seasonal: f64, discount: f64) -> Option<String> {
    let mut parts = Vec::new();
    if short_premium > 0.0 {
        parts.push(format!("short-term premium +{:.1}%", short_premium * 100.0));
    }
    if over_cap > 0.0 {
        parts.push(format!("over-cap premium +{:.1}%", over_cap * 100.0));
    }
    if seasonal > 0.0 {
        parts.push(format!("seasonal uplift +{:.1}%", seasonal * 100.0));
    }
    if discount > 0.0 {
        parts.push(format!("vacancy-age discount -{:.1}%", discount * 100.0));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}
