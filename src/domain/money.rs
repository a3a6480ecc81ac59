//! Monetary types, rounding rules and raw-value coercion.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Scaling factor applied to a base price.
pub type Multiplier = Decimal;

/// Round to whole currency units, half away from zero.
#[must_use]
pub fn round_units(value: Decimal) -> Decimal {
    round_dp(value, 0)
}

/// Round to `dp` decimal places, half away from zero.
#[must_use]
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Coerce a raw JSON price field into a [`Price`].
///
/// Marketplace APIs return prices as numbers or numeric strings. Anything
/// missing, unparseable or negative degrades to zero so that one malformed
/// record never aborts a snapshot.
#[must_use]
pub fn coerce_price(raw: Option<&Value>) -> Price {
    let parsed = match raw {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        _ => None,
    };

    match parsed {
        Some(value) if value.is_sign_positive() => value.normalize(),
        _ => Decimal::ZERO,
    }
}

/// Serialize decimals as JSON numbers rather than strings.
///
/// Persisted documents are shared with consumers that do arithmetic on the
/// raw values, so whole numbers are written as integers and everything else
/// as a float.
pub mod as_number {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        to_value(value).serialize(serializer)
    }

    pub fn to_value(value: &Decimal) -> Value {
        let normalized = value.normalize();
        if normalized.scale() == 0 {
            if let Some(int) = normalized.to_i64() {
                return Value::from(int);
            }
        }
        normalized.to_f64().map(Value::from).unwrap_or(Value::Null)
    }

    pub mod option {
        use rust_decimal::Decimal;
        use serde::{Serialize, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<Decimal>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            value.as_ref().map(super::to_value).serialize(serializer)
        }
    }

    pub mod map {
        use std::collections::BTreeMap;

        use rust_decimal::Decimal;
        use serde::ser::SerializeMap;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(
            value: &BTreeMap<String, Decimal>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(value.len()))?;
            for (key, price) in value {
                map.serialize_entry(key, &super::to_value(price))?;
            }
            map.end()
        }
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
