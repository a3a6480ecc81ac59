//! Configuration validation command.

use std::path::Path;

use crate::app::{Config, MarketplaceConfig, StoreBackend};
use crate::cli::output;
use crate::error::Result;

/// Validate configuration file without running a cycle.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    output::section(&format!("Checking configuration: {}", path.display()));

    let config = Config::load(path)?;
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Tolerance", config.reconciler.tolerance);
    output::field("UTC offset", format!("{:+}h", config.clock.utc_offset_hours));
    output::field("Store backend", format!("{:?}", config.store.backend));

    if config.store.backend == StoreBackend::Http {
        if config.store.token.is_some() {
            output::success("Store token found (from REPRICER_STORE_TOKEN env var)");
        } else {
            output::warning("No store token: set REPRICER_STORE_TOKEN to persist results");
        }
    }

    for market in &config.marketplaces {
        output::section(&format!("Marketplace: {}", market.name()));
        output::field("API", market.api_url());
        output::field("Config store", &market.store().config);
        output::field("Base prices", &market.store().base_prices);

        match market {
            MarketplaceConfig::Ozon(ozon) => {
                credential("OZON_CLIENT_ID", ozon.client_id.is_some());
                credential("OZON_API_KEY", ozon.api_key.is_some());
            }
            MarketplaceConfig::Wildberries(wb) => {
                output::field("Push mode", format!("{:?}", wb.push_mode));
                credential("WB_API_KEY", wb.api_key.is_some());
            }
        }
    }

    println!();
    Ok(())
}

fn credential(var: &str, present: bool) {
    if present {
        output::success(&format!("{var} set"));
    } else {
        output::warning(&format!("{var} not set"));
    }
}
