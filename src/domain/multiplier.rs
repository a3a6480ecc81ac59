//! Demand-driven multiplier calculation.
//!
//! Orders are expected to arrive evenly over the local day: with half the
//! day gone, half of `baseline_orders_day` should have been placed. The
//! ratio of actual to expected orders moves the multiplier one `step` up or
//! down, bounded by the configured ceiling and floor.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::money::{round_dp, Multiplier};
use super::pricing::PricingConfig;

const HOURS_PER_DAY: Decimal = dec!(24);

/// Outcome label of a multiplier decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Increase,
    Decrease,
    Hold,
    /// Demand is high but the multiplier is already at its ceiling.
    HoldMax,
    /// Demand is low but the multiplier is already at its floor.
    HoldMin,
}

impl Decision {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Decision::Increase => "increase",
            Decision::Decrease => "decrease",
            Decision::Hold => "hold",
            Decision::HoldMax => "hold_max",
            Decision::HoldMin => "hold_min",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one multiplier decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiplierDecision {
    /// New multiplier, two decimal places.
    pub multiplier: Multiplier,
    pub decision: Decision,
    /// Audit text: branch, ratio, threshold and raw counts.
    pub reason: String,
    /// Actual over expected orders, two decimal places.
    pub ratio: Decimal,
    /// Orders expected so far today, one decimal place.
    pub expected: Decimal,
    /// Local hours since midnight used for the decision.
    pub hours_passed: Decimal,
}

impl MultiplierDecision {
    /// Whether the multiplier differs from `previous`.
    #[must_use]
    pub fn changed_from(&self, previous: Multiplier) -> bool {
        self.multiplier != previous
    }
}

/// Orders expected by `hours_passed` under a linear intra-day pace.
#[must_use]
pub fn expected_orders(baseline_orders_day: Decimal, hours_passed: Decimal) -> Decimal {
    baseline_orders_day * hours_passed / HOURS_PER_DAY
}

/// Decide the next multiplier from today's order count.
///
/// `hours_passed` is the local-day fraction in hours, supplied by the
/// caller. Whatever the branch, the result stays within
/// `[min_multiplier, max_multiplier]`; if those bounds are inverted the
/// ceiling wins.
#[must_use]
pub fn decide(
    actual_orders: u32,
    current_multiplier: Multiplier,
    config: &PricingConfig,
    hours_passed: Decimal,
) -> MultiplierDecision {
    let actual = Decimal::from(actual_orders);
    let expected = expected_orders(config.baseline_orders_day, hours_passed);
    let ratio = if expected > Decimal::ZERO {
        actual / expected
    } else {
        Decimal::ZERO
    };
    let shown_ratio = round_dp(ratio, 2);

    let (proposed, decision, branch_reason) = if ratio > config.threshold_high {
        let raised = config
            .max_multiplier
            .min(current_multiplier + config.step);
        let decision = if raised > current_multiplier {
            Decision::Increase
        } else {
            Decision::HoldMax
        };
        (
            raised,
            decision,
            format!(
                "High demand: ratio {shown_ratio:.2} > {}",
                config.threshold_high.normalize()
            ),
        )
    } else if ratio < config.threshold_low {
        let lowered = config
            .min_multiplier
            .max(current_multiplier - config.step);
        let decision = if lowered < current_multiplier {
            Decision::Decrease
        } else {
            Decision::HoldMin
        };
        (
            lowered,
            decision,
            format!(
                "Low demand: ratio {shown_ratio:.2} < {}",
                config.threshold_low.normalize()
            ),
        )
    } else {
        (
            current_multiplier,
            Decision::Hold,
            format!(
                "Ratio {shown_ratio:.2} in range [{}-{}]",
                config.threshold_low.normalize(),
                config.threshold_high.normalize()
            ),
        )
    };

    // Bounds win over cent rounding
    let rounded = round_dp(proposed, 2);
    let bounded = clamp_to_bounds(rounded, config.min_multiplier, config.max_multiplier);
    let mut reason = format!(
        "{branch_reason} ({actual_orders} vs {:.1} expected)",
        round_dp(expected, 1)
    );
    if bounded != rounded {
        reason.push_str(&format!(
            "; clamped to [{}-{}]",
            config.min_multiplier.normalize(),
            config.max_multiplier.normalize()
        ));
    }

    MultiplierDecision {
        multiplier: bounded,
        decision,
        reason,
        ratio: shown_ratio,
        expected: round_dp(expected, 1),
        hours_passed,
    }
}

fn clamp_to_bounds(value: Multiplier, min: Multiplier, max: Multiplier) -> Multiplier {
    value.max(min).min(max)
}
