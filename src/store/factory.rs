//! Store construction from configuration.

use std::time::Duration;

use reqwest::Client;

use super::{
    BasePriceStore, ConfigStore, FileBasePriceStore, FileConfigStore, HttpBasePriceStore,
    HttpConfigStore,
};
use crate::app::{StoreBackend, StoreConfig, StoreLocation};
use crate::error::Result;

/// The pair of stores one marketplace's cycle works with.
pub struct Stores {
    pub config: Box<dyn ConfigStore>,
    pub base_prices: Box<dyn BasePriceStore>,
}

/// Factory for creating stores.
pub struct StoreFactory;

impl StoreFactory {
    #[allow(clippy::result_large_err)]
    pub fn create(config: &StoreConfig, location: &StoreLocation) -> Result<Stores> {
        match config.backend {
            StoreBackend::Http => {
                let client = Client::builder()
                    .timeout(Duration::from_millis(config.timeout_ms))
                    .build()?;
                Ok(Stores {
                    config: Box::new(HttpConfigStore::new(
                        client.clone(),
                        location.config.clone(),
                        config.token.clone(),
                    )),
                    base_prices: Box::new(HttpBasePriceStore::new(
                        client,
                        location.base_prices.clone(),
                        config.token.clone(),
                    )),
                })
            }
            StoreBackend::File => Ok(Stores {
                config: Box::new(FileConfigStore::new(&location.config)),
                base_prices: Box::new(FileBasePriceStore::new(&location.base_prices)),
            }),
        }
    }
}
