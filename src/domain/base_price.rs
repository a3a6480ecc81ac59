//! Base-price drift detection.
//!
//! The upstream system (ERP, 1C, ...) sometimes rewrites a product's price
//! directly on the marketplace, bypassing the multiplier. The reconciler
//! notices when a live price no longer equals `round(base × multiplier)`,
//! adopts the observed price as the new base and, when needed, emits the
//! corrected marketplace price.
//!
//! Each product goes through two sequential transitions:
//!
//! 1. [`update_baseline`] decides what the remembered base becomes.
//! 2. [`decide_push`] decides whether a price must be sent.
//!
//! The baseline is updated even when no push follows, so the reconciler's
//! memory tracks reality whether or not the marketplace price moves.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::comparator::{prices_match, DEFAULT_TOLERANCE};
use super::money::{round_units, Multiplier, Price};
use super::record::{
    AppliedMultipliers, BasePriceMap, CorrectionDebug, PriceCorrection, PriceRecord,
};

/// Multipliers within this distance of 1.0 are treated as neutral.
pub const NEUTRAL_BAND: Decimal = dec!(0.01);

/// What happens to an offer's remembered base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineUpdate {
    /// First sighting: the observed price becomes the base.
    Seed { observed: Price },
    /// Live price matches `round(base × multiplier)`.
    Keep { base: Price },
    /// Live price drifted: the upstream base changed.
    Replace { previous: Price, observed: Price },
}

impl BaselineUpdate {
    /// Base price after this transition.
    #[must_use]
    pub fn new_base(&self) -> Price {
        match *self {
            BaselineUpdate::Seed { observed } => observed,
            BaselineUpdate::Keep { base } => base,
            BaselineUpdate::Replace { observed, .. } => observed,
        }
    }

    /// Whether the base map entry changes.
    #[must_use]
    pub fn writes_base(&self) -> bool {
        !matches!(self, BaselineUpdate::Keep { .. })
    }
}

/// Whether a corrected price is sent to the marketplace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushDecision {
    /// Nothing changed upstream, or the product is new.
    NotNeeded,
    /// Multiplier is neutral, so the observed price is already correct.
    SkipNeutral,
    /// Corrected price would fall below the marketplace floor.
    SkipBelowFloor { target: Price, min_price: Price },
    Push(PriceCorrection),
}

/// Both transitions for one snapshot record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOutcome {
    pub offer_id: String,
    pub baseline: BaselineUpdate,
    pub push: PushDecision,
}

/// Counters over a single reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationStats {
    pub total: usize,
    pub unchanged: usize,
    pub base_changed: usize,
    pub new_products: usize,
    pub skipped_min_price: usize,
    /// Base changed while the multiplier was neutral; nothing to push.
    pub skipped_neutral: usize,
}

impl ReconciliationStats {
    /// Count one product outcome.
    pub fn record(&mut self, outcome: &ProductOutcome) {
        self.total += 1;
        match outcome.baseline {
            BaselineUpdate::Seed { .. } => self.new_products += 1,
            BaselineUpdate::Keep { .. } => self.unchanged += 1,
            BaselineUpdate::Replace { .. } => self.base_changed += 1,
        }
        match outcome.push {
            PushDecision::SkipNeutral => self.skipped_neutral += 1,
            PushDecision::SkipBelowFloor { .. } => self.skipped_min_price += 1,
            PushDecision::NotNeeded | PushDecision::Push(_) => {}
        }
    }

    /// Combine counters from two disjoint sets of products.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            unchanged: self.unchanged + other.unchanged,
            base_changed: self.base_changed + other.base_changed,
            new_products: self.new_products + other.new_products,
            skipped_min_price: self.skipped_min_price + other.skipped_min_price,
            skipped_neutral: self.skipped_neutral + other.skipped_neutral,
        }
    }
}

/// Output of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Corrections in snapshot order.
    pub corrections: Vec<PriceCorrection>,
    /// Previous map with every seeded or replaced entry applied.
    pub base_prices: BasePriceMap,
    /// Multiplier each kept offer's live price reflects. Entries for
    /// offers missing from the snapshot are carried over.
    pub reflected: AppliedMultipliers,
    pub stats: ReconciliationStats,
}

/// First transition: decide the offer's new base price.
#[must_use]
pub fn update_baseline(
    record: &PriceRecord,
    previous: Option<Price>,
    multiplier: Multiplier,
    tolerance: Decimal,
) -> BaselineUpdate {
    let Some(base) = previous else {
        return BaselineUpdate::Seed {
            observed: record.price,
        };
    };

    let target = round_units(base * multiplier);
    if prices_match(record.price, target, tolerance) {
        BaselineUpdate::Keep { base }
    } else {
        BaselineUpdate::Replace {
            previous: base,
            observed: record.price,
        }
    }
}

/// Second transition: decide whether a corrected price is pushed.
#[must_use]
pub fn decide_push(
    record: &PriceRecord,
    baseline: &BaselineUpdate,
    multiplier: Multiplier,
) -> PushDecision {
    let BaselineUpdate::Replace { previous, observed } = *baseline else {
        return PushDecision::NotNeeded;
    };

    let new_target = round_units(observed * multiplier);

    if (multiplier - Decimal::ONE).abs() < NEUTRAL_BAND {
        return PushDecision::SkipNeutral;
    }

    if record.has_floor() && new_target < record.min_price {
        return PushDecision::SkipBelowFloor {
            target: new_target,
            min_price: record.min_price,
        };
    }

    PushDecision::Push(PriceCorrection::new(
        record.offer_id.clone(),
        CorrectionDebug {
            observed_price: observed,
            previous_base: previous,
            new_base: observed,
            multiplier,
            new_target,
        },
    ))
}

/// Run both transitions for one record against the previous base map.
#[must_use]
pub fn assess(
    record: &PriceRecord,
    base_prices: &BasePriceMap,
    multiplier: Multiplier,
    tolerance: Decimal,
) -> ProductOutcome {
    let previous = base_prices.get(&record.offer_id).copied();
    let baseline = update_baseline(record, previous, multiplier, tolerance);
    let push = decide_push(record, &baseline, multiplier);
    ProductOutcome {
        offer_id: record.offer_id.clone(),
        baseline,
        push,
    }
}

/// Reconciles marketplace snapshots against the remembered base prices.
#[derive(Debug, Clone, Copy)]
pub struct BasePriceReconciler {
    tolerance: Decimal,
}

impl Default for BasePriceReconciler {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl BasePriceReconciler {
    #[must_use]
    pub const fn new(tolerance: Decimal) -> Self {
        Self { tolerance }
    }

    #[must_use]
    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Reconcile a full snapshot priced at `multiplier`.
    ///
    /// Every product is assessed against the *previous* map, so the result
    /// does not depend on snapshot order. Offers missing from the snapshot
    /// keep their entries.
    #[must_use]
    pub fn reconcile(
        &self,
        snapshot: &[PriceRecord],
        base_prices: &BasePriceMap,
        multiplier: Multiplier,
    ) -> Reconciliation {
        self.reconcile_applied(snapshot, base_prices, &AppliedMultipliers::new(), multiplier)
    }

    /// Reconcile a snapshot where some live prices lag behind `multiplier`.
    ///
    /// Drift is checked against the multiplier recorded in `applied` for
    /// the offer, or `multiplier` when there is none. Corrections always
    /// target `multiplier`.
    #[must_use]
    pub fn reconcile_applied(
        &self,
        snapshot: &[PriceRecord],
        base_prices: &BasePriceMap,
        applied: &AppliedMultipliers,
        multiplier: Multiplier,
    ) -> Reconciliation {
        let mut result = Reconciliation {
            base_prices: base_prices.clone(),
            reflected: applied.clone(),
            ..Default::default()
        };
        for record in snapshot {
            result.reflected.remove(&record.offer_id);
        }

        for record in snapshot {
            let reflected = applied
                .get(&record.offer_id)
                .copied()
                .unwrap_or(multiplier);
            let previous = base_prices.get(&record.offer_id).copied();
            let baseline = update_baseline(record, previous, reflected, self.tolerance);
            let outcome = ProductOutcome {
                offer_id: record.offer_id.clone(),
                push: decide_push(record, &baseline, multiplier),
                baseline,
            };

            result.stats.record(&outcome);
            if outcome.baseline.writes_base() {
                result
                    .base_prices
                    .insert(outcome.offer_id.clone(), outcome.baseline.new_base());
            } else {
                result
                    .reflected
                    .insert(outcome.offer_id.clone(), reflected);
            }
            if let PushDecision::Push(correction) = outcome.push {
                result.corrections.push(correction);
            }
        }

        result
    }
}

/// Reconcile with an explicit tolerance.
#[must_use]
pub fn reconcile(
    snapshot: &[PriceRecord],
    base_prices: &BasePriceMap,
    multiplier: Multiplier,
    tolerance: Decimal,
) -> Reconciliation {
    BasePriceReconciler::new(tolerance).reconcile(snapshot, base_prices, multiplier)
}
