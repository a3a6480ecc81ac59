//! Marketplace trait definitions.
//!
//! Every marketplace exposes its prices in its own encoding. Adapters
//! normalize them to one effective price per offer and translate
//! corrections back into native update payloads.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Price, PriceCorrection, PriceRecord};
use crate::error::Result;

/// Why a correction was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Marketplace refused a price below its minimum.
    BelowMinPrice { messages: Vec<String> },
    /// Not sent: the drop is large enough to trigger a quarantine.
    QuarantineRisk { observed: Price, target: Price },
    /// The whole batch request failed.
    BatchRejected { status: u16, message: String },
    /// Item-level rejection for any other reason.
    Rejected { messages: Vec<String> },
}

impl FailureReason {
    /// Whether this failure is a price-floor violation.
    #[must_use]
    pub fn is_floor_violation(&self) -> bool {
        matches!(self, FailureReason::BelowMinPrice { .. })
    }

    /// Whether the adapter withheld the update instead of sending it.
    #[must_use]
    pub fn is_withheld(&self) -> bool {
        matches!(self, FailureReason::QuarantineRisk { .. })
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::BelowMinPrice { messages } => {
                write!(f, "below minimum price: {}", messages.join("; "))
            }
            FailureReason::QuarantineRisk { observed, target } => {
                write!(f, "quarantine risk: {observed} -> {target}")
            }
            FailureReason::BatchRejected { status, message } => {
                write!(f, "batch rejected ({status}): {message}")
            }
            FailureReason::Rejected { messages } => write!(f, "rejected: {}", messages.join("; ")),
        }
    }
}

/// A correction that did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushFailure {
    pub offer_id: String,
    pub reason: FailureReason,
}

impl PushFailure {
    pub fn new(offer_id: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            offer_id: offer_id.into(),
            reason,
        }
    }
}

/// Per-offer outcome of a push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<PushFailure>,
}

impl PushReport {
    /// Number of offers rejected for violating the price floor.
    #[must_use]
    pub fn floor_violations(&self) -> usize {
        self.failed
            .iter()
            .filter(|f| f.reason.is_floor_violation())
            .count()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Append the outcome of another batch.
    pub fn extend(&mut self, other: PushReport) {
        self.succeeded.extend(other.succeeded);
        self.failed.extend(other.failed);
    }
}

/// A marketplace the engine can read prices from and push corrections to.
#[async_trait]
pub trait MarketplaceAdapter: Send + Sync {
    /// Marketplace name for logging.
    fn name(&self) -> &'static str;

    /// Fetch every product's effective price and floor, all pages.
    ///
    /// Transport failures are returned as errors; records are never
    /// silently dropped.
    async fn fetch_snapshot(&self) -> Result<Vec<PriceRecord>>;

    /// Apply corrections, reporting per-offer success or failure.
    async fn push_corrections(&self, corrections: &[PriceCorrection]) -> Result<PushReport>;
}
