//! Repricer - demand-driven price multiplier and base-price reconciliation
//! for marketplace sellers.
//!
//! Each cycle compares live marketplace prices against remembered base
//! prices, adjusts a global multiplier from today's order pace, and pushes
//! the corrections back to the marketplace.
//!
//! # Modules
//!
//! - [`domain`] - Pure pricing logic: comparator, reconciler, multiplier engine
//! - [`marketplace`] - Adapter trait and factory
//! - [`adapter`] - Ozon and Wildberries HTTP adapters
//! - [`store`] - Config and base-price persistence (HTTP or file)
//! - [`app`] - Configuration, clock and cycle orchestration
//! - [`cli`] - Command-line handlers
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use repricer::domain::{BasePriceMap, BasePriceReconciler, PriceRecord};
//! use rust_decimal_macros::dec;
//!
//! let snapshot = vec![PriceRecord::new("sku-1", dec!(1000), dec!(0))];
//! let mut base = BasePriceMap::new();
//! base.insert("sku-1".into(), dec!(800));
//!
//! let result = BasePriceReconciler::default().reconcile(&snapshot, &base, dec!(1.5));
//! assert_eq!(result.corrections[0].new_price, dec!(1500));
//! assert_eq!(result.base_prices["sku-1"], dec!(1000));
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod marketplace;
pub mod store;
