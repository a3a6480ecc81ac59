//! Persistence for pricing config and base prices.
//!
//! Both documents live behind small async traits so the cycle can run
//! against the remote HTTP endpoints, local files, or in-memory test
//! doubles.

mod document;
mod factory;
mod file;
mod http;

use async_trait::async_trait;

use crate::domain::BaseState;
use crate::error::Result;

pub use document::{BasePriceDocument, ConfigDocument};
pub use factory::{StoreFactory, Stores};
pub use file::{FileBasePriceStore, FileConfigStore};
pub use http::{HttpBasePriceStore, HttpConfigStore};

/// Storage for the per-marketplace pricing config document.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the document; defaults when none has been saved yet.
    async fn load_config(&self) -> Result<ConfigDocument>;

    /// Replace the stored document.
    async fn save_config(&self, document: &ConfigDocument) -> Result<()>;
}

/// Storage for remembered base prices and the multipliers live prices
/// reflect.
#[async_trait]
pub trait BasePriceStore: Send + Sync {
    /// Load the state; empty when none has been saved yet.
    async fn load_base_prices(&self) -> Result<BaseState>;

    /// Replace the stored state wholesale.
    async fn save_base_prices(&self, state: &BaseState) -> Result<()>;
}
