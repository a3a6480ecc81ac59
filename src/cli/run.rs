//! Handler for the `run` command.

use chrono::Utc;
use tracing::info;

use crate::app::clock::fixed_offset;
use crate::app::{Config, Cycle, CycleOptions, CycleReport};
use crate::cli::{output, RunArgs};
use crate::domain::BasePriceReconciler;
use crate::error::Result;
use crate::marketplace::MarketplaceFactory;
use crate::store::StoreFactory;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;

    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    config.init_logging();

    let market = config.marketplace(&args.marketplace)?;
    let adapter = MarketplaceFactory::create(market, config.reconciler.tolerance)?;
    let stores = StoreFactory::create(&config.store, market.store())?;
    let offset = fixed_offset(config.clock.utc_offset_hours)?;
    let reconciler = BasePriceReconciler::new(config.reconciler.tolerance);

    let options = CycleOptions {
        orders: args.orders,
        dry_run: args.dry_run,
        now: args.now.unwrap_or_else(Utc::now),
    };
    info!(
        marketplace = market.name(),
        orders = ?options.orders,
        dry_run = options.dry_run,
        "Starting cycle"
    );

    let report = Cycle::new(adapter, stores, reconciler, offset)
        .run(&options)
        .await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &CycleReport) {
    output::section(&format!("Cycle: {}", report.marketplace));
    output::field("Products", report.products);

    match &report.decision {
        Some(decision) => {
            output::field("Decision", decision.decision);
            output::field("Reason", &decision.reason);
        }
        None => output::field("Decision", "skipped (no order count)"),
    }
    output::field(
        "Multiplier",
        format!(
            "{} -> {}",
            report.previous_multiplier.normalize(),
            report.multiplier.normalize()
        ),
    );

    let stats = &report.reconciliation;
    output::field("Unchanged", stats.unchanged);
    output::field("Base changed", stats.base_changed);
    output::field("New products", stats.new_products);
    output::field("Below min price", stats.skipped_min_price);
    output::field("Neutral skips", stats.skipped_neutral);
    if let Some(repricing) = &report.repricing {
        output::field("Repriced", repricing.repriced);
        output::field("Already in line", repricing.in_line);
    }
    if report.lagging > 0 {
        output::field("Behind multiplier", report.lagging);
    }

    if report.corrections.is_empty() {
        output::section("Corrections");
        output::success("No corrections needed");
    } else {
        output::section(&format!("Corrections ({})", report.corrections.len()));
        output::corrections(&report.corrections);
    }

    if report.dry_run {
        output::warning("Dry run: nothing pushed or persisted");
        return;
    }

    if let Some(push) = &report.push {
        if push.is_clean() {
            output::success(&format!("{} prices updated", push.succeeded.len()));
        } else {
            output::warning(&format!(
                "{} updated, {} not applied",
                push.succeeded.len(),
                push.failed.len()
            ));
            output::failures(&push.failed);
        }
    }
}
