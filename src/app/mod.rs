//! Application layer - configuration, clock and cycle orchestration.

pub mod clock;
mod config;
mod cycle;

pub use config::{
    ClockConfig, Config, LoggingConfig, MarketplaceConfig, OzonConfig, ReconcilerConfig,
    StoreBackend, StoreConfig, StoreLocation, WbPushMode, WildberriesConfig, MAX_PAGE_SIZE,
};
pub use cycle::{preview_multiplier, Cycle, CycleOptions, CycleReport};
