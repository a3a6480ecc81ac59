//! Marketplace-agnostic pricing logic.
//!
//! Everything here is pure: no I/O, no clock reads. Callers fetch
//! snapshots and configuration, call into these functions and persist the
//! results.

pub mod base_price;
pub mod comparator;
pub mod error;
pub mod money;
pub mod multiplier;
pub mod pricing;
pub mod record;
pub mod repricing;

pub use base_price::{
    BasePriceReconciler, BaselineUpdate, ProductOutcome, PushDecision, Reconciliation,
    ReconciliationStats,
};
pub use comparator::{prices_match, DEFAULT_TOLERANCE};
pub use error::DomainError;
pub use money::{Multiplier, Price};
pub use multiplier::{Decision, MultiplierDecision};
pub use pricing::PricingConfig;
pub use record::{
    AppliedMultipliers, BasePriceMap, BaseState, CorrectionDebug, PriceCorrection, PriceRecord,
};
pub use repricing::{plan_repricing, settle_applied, RepricingPlan, RepricingStats};
