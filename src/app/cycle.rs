//! One reconciliation cycle for one marketplace.
//!
//! load config and base prices → fetch snapshot → decide multiplier →
//! reconcile → reprice → push → persist. Any error aborts the cycle before
//! anything is persisted; the scheduler reruns it whole.

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info, warn};

use super::clock::local_day_hours;
use crate::domain::multiplier::decide;
use crate::domain::{
    plan_repricing, settle_applied, BasePriceReconciler, BaseState, Multiplier,
    MultiplierDecision, PriceCorrection, PriceRecord, ReconciliationStats, RepricingStats,
};
use crate::error::Result;
use crate::marketplace::{MarketplaceAdapter, PushReport};
use crate::store::{BasePriceStore, ConfigStore, Stores};

/// Per-run inputs.
#[derive(Debug, Clone)]
pub struct CycleOptions {
    /// Orders placed so far today. `None` skips the multiplier decision.
    pub orders: Option<u32>,
    /// Compute everything, push and persist nothing.
    pub dry_run: bool,
    pub now: DateTime<Utc>,
}

/// What a cycle did.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub marketplace: &'static str,
    pub products: usize,
    /// Multiplier the live prices reflected when the cycle started.
    pub previous_multiplier: Multiplier,
    pub multiplier: Multiplier,
    pub decision: Option<MultiplierDecision>,
    pub reconciliation: ReconciliationStats,
    /// Present when the multiplier moved and prices were replanned.
    pub repricing: Option<RepricingStats>,
    pub corrections: Vec<PriceCorrection>,
    /// `None` when nothing was pushed.
    pub push: Option<PushReport>,
    /// Offers whose live price still reflects an earlier multiplier.
    pub lagging: usize,
    pub dry_run: bool,
}

impl CycleReport {
    #[must_use]
    pub fn multiplier_changed(&self) -> bool {
        self.multiplier != self.previous_multiplier
    }
}

/// Runs cycles against one marketplace and its stores.
pub struct Cycle {
    adapter: Box<dyn MarketplaceAdapter>,
    config_store: Box<dyn ConfigStore>,
    base_store: Box<dyn BasePriceStore>,
    reconciler: BasePriceReconciler,
    offset: FixedOffset,
}

impl Cycle {
    #[must_use]
    pub fn new(
        adapter: Box<dyn MarketplaceAdapter>,
        stores: Stores,
        reconciler: BasePriceReconciler,
        offset: FixedOffset,
    ) -> Self {
        Self {
            adapter,
            config_store: stores.config,
            base_store: stores.base_prices,
            reconciler,
            offset,
        }
    }

    pub async fn run(&self, options: &CycleOptions) -> Result<CycleReport> {
        let marketplace = self.adapter.name();

        let mut document = self.config_store.load_config().await?;
        let base = self.base_store.load_base_prices().await?;
        let previous_multiplier = document.pricing.current_multiplier;
        debug!(
            marketplace,
            multiplier = %previous_multiplier,
            known_products = base.prices.len(),
            lagging = base.applied.len(),
            "Loaded pricing state"
        );

        let snapshot = self.adapter.fetch_snapshot().await?;

        let decision = options.orders.map(|orders| {
            let hours = local_day_hours(options.now, self.offset);
            decide(orders, previous_multiplier, &document.pricing, hours)
        });
        if let Some(decision) = &decision {
            info!(
                marketplace,
                decision = %decision.decision,
                multiplier = %decision.multiplier,
                ratio = %decision.ratio,
                reason = %decision.reason,
                "Multiplier decided"
            );
            document.pricing.apply_decision(decision, options.now);
        }
        let multiplier = document.pricing.current_multiplier;

        // Live prices still carry the previous multiplier, or an older one
        // where an earlier push did not land
        let reconciliation = self.reconciler.reconcile_applied(
            &snapshot,
            &base.prices,
            &base.applied,
            previous_multiplier,
        );
        let stats = reconciliation.stats;
        info!(
            marketplace,
            total = stats.total,
            unchanged = stats.unchanged,
            base_changed = stats.base_changed,
            new_products = stats.new_products,
            skipped_min_price = stats.skipped_min_price,
            skipped_neutral = stats.skipped_neutral,
            "Base prices reconciled"
        );

        let lagging: Vec<PriceRecord> = snapshot
            .iter()
            .filter(|record| {
                reconciliation
                    .reflected
                    .get(&record.offer_id)
                    .is_some_and(|reflected| *reflected != multiplier)
            })
            .cloned()
            .collect();

        let (corrections, repricing, in_line) = if multiplier != previous_multiplier {
            let plan = plan_repricing(
                &snapshot,
                &reconciliation.base_prices,
                multiplier,
                self.reconciler.tolerance(),
            );
            info!(
                marketplace,
                from = %previous_multiplier,
                to = %multiplier,
                repriced = plan.stats.repriced,
                in_line = plan.stats.in_line,
                skipped_min_price = plan.stats.skipped_min_price,
                "Repricing for new multiplier"
            );
            (plan.corrections, Some(plan.stats), plan.in_line)
        } else if lagging.is_empty() {
            (reconciliation.corrections, None, Vec::new())
        } else {
            let plan = plan_repricing(
                &lagging,
                &reconciliation.base_prices,
                multiplier,
                self.reconciler.tolerance(),
            );
            info!(
                marketplace,
                lagging = lagging.len(),
                repriced = plan.stats.repriced,
                skipped_min_price = plan.stats.skipped_min_price,
                "Repricing offers behind the current multiplier"
            );
            let mut corrections = reconciliation.corrections;
            corrections.extend(plan.corrections);
            (corrections, Some(plan.stats), plan.in_line)
        };

        if options.dry_run {
            info!(
                marketplace,
                corrections = corrections.len(),
                "Dry run: nothing pushed or persisted"
            );
            let lagging = settle_applied(reconciliation.reflected, &in_line, multiplier).len();
            return Ok(CycleReport {
                marketplace,
                products: snapshot.len(),
                previous_multiplier,
                multiplier,
                decision,
                reconciliation: stats,
                repricing,
                corrections,
                push: None,
                lagging,
                dry_run: true,
            });
        }

        let push = if corrections.is_empty() {
            None
        } else {
            let report = self.adapter.push_corrections(&corrections).await?;
            if !report.is_clean() {
                warn!(
                    marketplace,
                    failed = report.failed.len(),
                    below_min_price = report.floor_violations(),
                    "Some corrections were not applied"
                );
            }
            Some(report)
        };

        let succeeded = push
            .as_ref()
            .map_or(&[][..], |report| report.succeeded.as_slice());
        let state = BaseState {
            prices: reconciliation.base_prices,
            applied: settle_applied(
                reconciliation.reflected,
                succeeded.iter().chain(&in_line),
                multiplier,
            ),
        };
        if !state.applied.is_empty() {
            warn!(
                marketplace,
                lagging = state.applied.len(),
                "Some offers are still priced at an earlier multiplier"
            );
        }
        self.base_store.save_base_prices(&state).await?;
        if decision.is_some() {
            document.set_marketplace(marketplace);
            self.config_store.save_config(&document).await?;
        }
        info!(marketplace, "Pricing state persisted");

        Ok(CycleReport {
            marketplace,
            products: snapshot.len(),
            previous_multiplier,
            multiplier,
            decision,
            reconciliation: stats,
            repricing,
            corrections,
            push,
            lagging: state.applied.len(),
            dry_run: false,
        })
    }
}

/// Decide the multiplier without touching the marketplace or persisting.
pub async fn preview_multiplier(
    config_store: &dyn ConfigStore,
    orders: u32,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<(Multiplier, MultiplierDecision)> {
    let document = config_store.load_config().await?;
    let current = document.pricing.current_multiplier;
    let hours = local_day_hours(now, offset);
    Ok((current, decide(orders, current, &document.pricing, hours)))
}
