//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. Secrets (store token, marketplace
//! API keys) come only from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use url::Url;

use crate::domain::DEFAULT_TOLERANCE;
use crate::error::{ConfigError, Result};

mod logging;
mod marketplace;
mod store;

pub use logging::LoggingConfig;
pub use marketplace::{MarketplaceConfig, OzonConfig, StoreLocation, WbPushMode, WildberriesConfig};
pub use store::{StoreBackend, StoreConfig};

/// Largest page / batch the marketplace APIs accept.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Reconciler settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcilerConfig {
    /// Relative tolerance for "price already matches".
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
}

fn default_tolerance() -> Decimal {
    DEFAULT_TOLERANCE
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
        }
    }
}

/// Clock used to compute the fraction of the local day that has passed.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// Fixed offset from UTC in whole hours. Moscow time by default.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

const fn default_utc_offset_hours() -> i32 {
    3
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub marketplaces: Vec<MarketplaceConfig>,
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Parse and validate a TOML document, filling secrets from the environment.
    #[allow(clippy::result_large_err)]
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Secrets are never read from the config file
        config.store.token = marketplace::non_empty_env("REPRICER_STORE_TOKEN");
        for market in &mut config.marketplaces {
            market.load_credentials();
        }

        config.validate()?;

        Ok(config)
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.marketplaces.is_empty() {
            return Err(ConfigError::MissingField {
                field: "marketplaces",
            }
            .into());
        }

        let tolerance = self.reconciler.tolerance;
        if tolerance <= Decimal::ZERO || tolerance >= Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "tolerance",
                reason: format!("must be in (0, 1), got {tolerance}"),
            }
            .into());
        }

        if !(-12..=14).contains(&self.clock.utc_offset_hours) {
            return Err(ConfigError::InvalidValue {
                field: "utc_offset_hours",
                reason: format!("must be in -12..=14, got {}", self.clock.utc_offset_hours),
            }
            .into());
        }

        let mut seen = Vec::with_capacity(self.marketplaces.len());
        for market in &self.marketplaces {
            if seen.contains(&market.name()) {
                return Err(ConfigError::InvalidValue {
                    field: "marketplaces",
                    reason: format!("{} configured more than once", market.name()),
                }
                .into());
            }
            seen.push(market.name());
            self.validate_marketplace(market)?;
        }

        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn validate_marketplace(&self, market: &MarketplaceConfig) -> Result<()> {
        Url::parse(market.api_url()).map_err(|e| ConfigError::InvalidValue {
            field: "api_url",
            reason: format!("{}: {e}", market.name()),
        })?;

        let (page_size, batch_size) = market.page_and_batch();
        for (field, value) in [("page_size", page_size), ("batch_size", batch_size)] {
            if value == 0 || value > MAX_PAGE_SIZE {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be in 1..={MAX_PAGE_SIZE}, got {value}"),
                }
                .into());
            }
        }

        let store = market.store();
        if store.config.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "store.config",
            }
            .into());
        }
        if store.base_prices.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "store.base_prices",
            }
            .into());
        }
        if self.store.backend == StoreBackend::Http {
            for location in [&store.config, &store.base_prices] {
                Url::parse(location).map_err(|e| ConfigError::InvalidValue {
                    field: "store",
                    reason: format!("{location}: {e}"),
                })?;
            }
        }

        Ok(())
    }

    /// Look up a configured marketplace by name.
    #[allow(clippy::result_large_err)]
    pub fn marketplace(&self, name: &str) -> Result<&MarketplaceConfig> {
        self.marketplaces
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownMarketplace(name.to_string()).into())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
