//! Domain validation errors.
//!
//! Returned when a pricing configuration violates the rules the decision
//! engines rely on. Stores surface them as validation failures.

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A pricing parameter is outside its allowed range.
    #[error("invalid pricing parameter {field}: {reason}")]
    InvalidPricing {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}
