//! Pricing configuration shared between cycles.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::money::{as_number, round_dp, Multiplier};
use super::multiplier::{Decision, MultiplierDecision};

/// Demand thresholds, multiplier bounds and the audit trail of the last
/// decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Orders expected over a full local day.
    #[serde(default = "default_baseline_orders_day", with = "number")]
    pub baseline_orders_day: Decimal,
    /// Ratio above which the multiplier goes up.
    #[serde(default = "default_threshold_high", with = "number")]
    pub threshold_high: Decimal,
    /// Ratio below which the multiplier goes down.
    #[serde(default = "default_threshold_low", with = "number")]
    pub threshold_low: Decimal,
    #[serde(default = "default_step", with = "number")]
    pub step: Decimal,
    #[serde(default = "default_max_multiplier", with = "number")]
    pub max_multiplier: Multiplier,
    #[serde(default = "default_min_multiplier", with = "number")]
    pub min_multiplier: Multiplier,
    #[serde(default = "default_current_multiplier", with = "number")]
    pub current_multiplier: Multiplier,

    #[serde(default)]
    pub last_check: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_decision: Option<Decision>,
    #[serde(default)]
    pub last_reason: Option<String>,
    /// When the multiplier last actually moved.
    #[serde(default)]
    pub last_change: Option<DateTime<Utc>>,
    /// Local hours since midnight at the last check.
    #[serde(default, with = "option_number")]
    pub moscow_hours: Option<Decimal>,
}

mod number {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        super::as_number::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer)
    }
}

mod option_number {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        super::as_number::option::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        Option::<Decimal>::deserialize(deserializer)
    }
}

fn default_baseline_orders_day() -> Decimal {
    dec!(45)
}

fn default_threshold_high() -> Decimal {
    dec!(1.2)
}

fn default_threshold_low() -> Decimal {
    dec!(0.8)
}

fn default_step() -> Decimal {
    dec!(0.05)
}

fn default_max_multiplier() -> Decimal {
    dec!(1.70)
}

fn default_min_multiplier() -> Decimal {
    dec!(0.85)
}

fn default_current_multiplier() -> Decimal {
    Decimal::ONE
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            baseline_orders_day: default_baseline_orders_day(),
            threshold_high: default_threshold_high(),
            threshold_low: default_threshold_low(),
            step: default_step(),
            max_multiplier: default_max_multiplier(),
            min_multiplier: default_min_multiplier(),
            current_multiplier: default_current_multiplier(),
            last_check: None,
            last_decision: None,
            last_reason: None,
            last_change: None,
            moscow_hours: None,
        }
    }
}

impl PricingConfig {
    /// Check the parameters the multiplier engine assumes are sane.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.baseline_orders_day < Decimal::ZERO {
            return Err(invalid("baseline_orders_day", "must not be negative"));
        }
        if self.step <= Decimal::ZERO {
            return Err(invalid("step", "must be positive"));
        }
        if self.min_multiplier <= Decimal::ZERO {
            return Err(invalid("min_multiplier", "must be positive"));
        }
        if self.min_multiplier > self.max_multiplier {
            return Err(invalid(
                "max_multiplier",
                format!(
                    "{} is below min_multiplier {}",
                    self.max_multiplier, self.min_multiplier
                ),
            ));
        }
        if self.threshold_low > self.threshold_high {
            return Err(invalid(
                "threshold_high",
                format!(
                    "{} is below threshold_low {}",
                    self.threshold_high, self.threshold_low
                ),
            ));
        }
        Ok(())
    }

    /// Record a multiplier decision taken at `now`.
    pub fn apply_decision(&mut self, decision: &MultiplierDecision, now: DateTime<Utc>) {
        if decision.multiplier != self.current_multiplier {
            self.last_change = Some(now);
        }
        self.current_multiplier = decision.multiplier;
        self.last_check = Some(now);
        self.last_decision = Some(decision.decision);
        self.last_reason = Some(decision.reason.clone());
        self.moscow_hours = Some(round_dp(decision.hours_passed, 1));
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> DomainError {
    DomainError::InvalidPricing {
        field,
        reason: reason.into(),
    }
}
