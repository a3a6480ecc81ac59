//! Marketplace adapter factory.
//!
//! Creates marketplace-specific implementations based on configuration.

use crate::adapter::ozon::OzonAdapter;
use crate::adapter::wildberries::WildberriesAdapter;
use crate::app::MarketplaceConfig;
use crate::domain::Price;
use crate::error::Result;

use super::MarketplaceAdapter;

/// Factory for creating marketplace adapters.
pub struct MarketplaceFactory;

impl MarketplaceFactory {
    /// Create the adapter for a configured marketplace.
    ///
    /// `tolerance` is the relative price tolerance used across the cycle.
    /// Fails when the marketplace's API credentials are missing.
    #[allow(clippy::result_large_err)]
    pub fn create(
        config: &MarketplaceConfig,
        tolerance: Price,
    ) -> Result<Box<dyn MarketplaceAdapter>> {
        match config {
            MarketplaceConfig::Ozon(ozon) => Ok(Box::new(OzonAdapter::new(ozon)?)),
            MarketplaceConfig::Wildberries(wb) => Ok(Box::new(
                WildberriesAdapter::new(wb)?.with_tolerance(tolerance),
            )),
        }
    }
}
