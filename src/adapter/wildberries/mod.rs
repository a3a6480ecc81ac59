//! Wildberries marketplace integration.

mod client;
pub mod pricing;
mod types;

pub use client::WildberriesAdapter;
pub use types::PriceUpdate;
