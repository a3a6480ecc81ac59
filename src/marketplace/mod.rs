//! Marketplace abstraction layer.
//!
//! Defines the trait marketplace implementations must fulfill so the cycle
//! can run against any of them.

mod factory;
mod traits;

pub use factory::MarketplaceFactory;
pub use traits::{FailureReason, MarketplaceAdapter, PushFailure, PushReport};
