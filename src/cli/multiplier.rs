//! Handler for the `multiplier` command.

use chrono::Utc;

use crate::app::clock::fixed_offset;
use crate::app::{preview_multiplier, Config};
use crate::cli::{output, MultiplierArgs};
use crate::error::Result;
use crate::store::StoreFactory;

/// Show what the multiplier engine would decide right now.
pub async fn execute(args: &MultiplierArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    config.init_logging();

    let market = config.marketplace(&args.marketplace)?;
    let stores = StoreFactory::create(&config.store, market.store())?;
    let offset = fixed_offset(config.clock.utc_offset_hours)?;
    let now = args.now.unwrap_or_else(Utc::now);

    let (current, decision) =
        preview_multiplier(stores.config.as_ref(), args.orders, now, offset).await?;

    output::section(&format!("Multiplier: {}", market.name()));
    output::field("Local hours", decision.hours_passed.round_dp(2));
    output::field("Orders", args.orders);
    output::field("Expected", decision.expected);
    output::field("Ratio", decision.ratio);
    output::field("Decision", decision.decision);
    output::field(
        "Multiplier",
        format!("{} -> {}", current.normalize(), decision.multiplier.normalize()),
    );
    output::field("Reason", &decision.reason);
    Ok(())
}
