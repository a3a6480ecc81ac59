//! Repricing after a multiplier change.
//!
//! Once the multiplier moves, every product's target becomes
//! `round(base × new_multiplier)`. This plan is computed from a base map
//! that has already been reconciled, so drifted products are repriced from
//! their freshly adopted base.
//!
//! Offers that cannot be moved (floor, rejected push) keep the multiplier
//! their live price reflects until a later cycle moves them.

use rust_decimal::Decimal;
use serde::Serialize;

use super::comparator::prices_match;
use super::money::{round_units, Multiplier};
use super::record::{
    AppliedMultipliers, BasePriceMap, CorrectionDebug, PriceCorrection, PriceRecord,
};

/// Counters over one repricing plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepricingStats {
    pub total: usize,
    /// Live price already matches the new target.
    pub in_line: usize,
    pub repriced: usize,
    pub skipped_min_price: usize,
    /// Snapshot products with no base entry.
    pub unknown: usize,
}

/// Corrections that move a snapshot onto a new multiplier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepricingPlan {
    pub corrections: Vec<PriceCorrection>,
    /// Offers whose live price already matches the new target.
    pub in_line: Vec<String>,
    pub stats: RepricingStats,
}

/// Plan the corrections needed to apply `multiplier` to every known product.
#[must_use]
pub fn plan_repricing(
    snapshot: &[PriceRecord],
    base_prices: &BasePriceMap,
    multiplier: Multiplier,
    tolerance: Decimal,
) -> RepricingPlan {
    let mut plan = RepricingPlan::default();

    for record in snapshot {
        plan.stats.total += 1;

        let Some(&base) = base_prices.get(&record.offer_id) else {
            plan.stats.unknown += 1;
            continue;
        };

        let target = round_units(base * multiplier);
        if prices_match(record.price, target, tolerance) {
            plan.stats.in_line += 1;
            plan.in_line.push(record.offer_id.clone());
            continue;
        }

        if record.has_floor() && target < record.min_price {
            plan.stats.skipped_min_price += 1;
            continue;
        }

        plan.stats.repriced += 1;
        plan.corrections.push(PriceCorrection::new(
            record.offer_id.clone(),
            CorrectionDebug {
                observed_price: record.price,
                previous_base: base,
                new_base: base,
                multiplier,
                new_target: target,
            },
        ));
    }

    plan
}

/// Multipliers live prices reflect once a push has landed.
///
/// Offers in `settled` (pushed, or already in line) now carry `current`.
/// Entries equal to `current` are dropped, leaving only offers that lag
/// behind it.
#[must_use]
pub fn settle_applied<'a>(
    mut reflected: AppliedMultipliers,
    settled: impl IntoIterator<Item = &'a String>,
    current: Multiplier,
) -> AppliedMultipliers {
    for offer_id in settled {
        reflected.remove(offer_id);
    }
    reflected.retain(|_, multiplier| *multiplier != current);
    reflected
}
