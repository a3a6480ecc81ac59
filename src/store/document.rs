//! Persisted documents: pricing config and base prices.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::money::{as_number, coerce_price};
use crate::domain::{AppliedMultipliers, BasePriceMap, BaseState, PricingConfig};
use crate::error::{Result, StoreError};

/// Config document as stored: `{"pricing": {...}, ...metadata}`.
///
/// Keys other than `pricing` are kept as-is and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDocument {
    /// Parse and validate a stored document.
    #[allow(clippy::result_large_err)]
    pub fn from_json(raw: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(raw).map_err(|e| StoreError::Validation {
            reason: format!("malformed config document: {e}"),
        })?;
        document.validate()?;
        Ok(document)
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        self.pricing.validate().map_err(|e| StoreError::Validation {
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Record which marketplace the document belongs to.
    pub fn set_marketplace(&mut self, marketplace: &str) {
        self.extra
            .insert("_marketplace".into(), Value::String(marketplace.to_string()));
    }

    /// Timestamp written by the store on the last save.
    #[must_use]
    pub fn updated_at(&self) -> Option<&str> {
        self.extra.get("_updated_at").and_then(Value::as_str)
    }

    pub(crate) fn stamp(&mut self, now: DateTime<Utc>) {
        self.extra
            .insert("_updated_at".into(), Value::String(timestamp(now)));
    }
}

/// Base-price document: `{"prices": {offer_id: base}, "_updated_at", "_count"}`.
///
/// Offers priced at an earlier multiplier are listed under
/// `applied_multipliers`; the key is omitted when there are none.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BasePriceDocument {
    #[serde(serialize_with = "as_number::map::serialize")]
    pub prices: BasePriceMap,
    #[serde(
        rename = "applied_multipliers",
        serialize_with = "as_number::map::serialize",
        skip_serializing_if = "AppliedMultipliers::is_empty"
    )]
    pub applied: AppliedMultipliers,
    #[serde(rename = "_updated_at")]
    pub updated_at: Option<String>,
    #[serde(rename = "_count", skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl BasePriceDocument {
    #[must_use]
    pub fn new(prices: BasePriceMap) -> Self {
        Self {
            prices,
            applied: AppliedMultipliers::new(),
            updated_at: None,
            count: None,
        }
    }

    #[must_use]
    pub fn from_state(state: &BaseState) -> Self {
        Self {
            applied: state.applied.clone(),
            ..Self::new(state.prices.clone())
        }
    }

    #[must_use]
    pub fn into_state(self) -> BaseState {
        BaseState {
            prices: self.prices,
            applied: self.applied,
        }
    }

    /// Parse a stored document.
    ///
    /// `prices` may be an object, an empty array (what the endpoint returns
    /// before the first save) or absent. Malformed values coerce to zero.
    #[allow(clippy::result_large_err)]
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).map_err(|e| StoreError::Validation {
            reason: format!("malformed base-price document: {e}"),
        })?;
        let Value::Object(mut root) = value else {
            return Err(StoreError::Validation {
                reason: "base-price document is not an object".into(),
            }
            .into());
        };

        let prices = match root.remove("prices") {
            None | Some(Value::Null) => BasePriceMap::new(),
            Some(Value::Array(items)) if items.is_empty() => BasePriceMap::new(),
            Some(Value::Object(entries)) => entries
                .into_iter()
                .map(|(offer_id, raw)| (offer_id, coerce_price(Some(&raw))))
                .collect(),
            Some(other) => {
                return Err(StoreError::Validation {
                    reason: format!("prices must be an object, got {other}"),
                }
                .into())
            }
        };

        // Unusable multipliers are dropped: the offer falls back to the current one
        let applied = match root.remove("applied_multipliers") {
            Some(Value::Object(entries)) => entries
                .into_iter()
                .map(|(offer_id, raw)| (offer_id, coerce_price(Some(&raw))))
                .filter(|(_, multiplier)| *multiplier > Decimal::ZERO)
                .collect(),
            _ => AppliedMultipliers::new(),
        };

        let updated_at = root
            .get("_updated_at")
            .and_then(Value::as_str)
            .map(str::to_string);
        let count = root
            .get("_count")
            .and_then(Value::as_u64)
            .and_then(|c| usize::try_from(c).ok());

        Ok(Self {
            prices,
            applied,
            updated_at,
            count,
        })
    }

    pub(crate) fn stamp(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(timestamp(now));
        self.count = Some(self.prices.len());
    }
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_array_means_no_prices() {
        let doc = BasePriceDocument::from_json(r#"{"prices":[],"_updated_at":null}"#).unwrap();
        assert!(doc.prices.is_empty());
        assert_eq!(doc.updated_at, None);
    }

    #[test]
    fn base_prices_are_coerced() {
        let doc = BasePriceDocument::from_json(
            r#"{"prices":{"a":"1000","b":1250.5,"c":"n/a"},"_updated_at":"2026-10-01T10:00:00Z","_count":3}"#,
        )
        .unwrap();
        assert_eq!(doc.prices["a"], dec!(1000));
        assert_eq!(doc.prices["b"], dec!(1250.5));
        assert_eq!(doc.prices["c"], dec!(0));
        assert_eq!(doc.count, Some(3));
    }

    #[test]
    fn non_object_prices_are_rejected() {
        let err = BasePriceDocument::from_json(r#"{"prices":[1,2]}"#).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Store(StoreError::Validation { .. })
        ));
    }

    #[test]
    fn base_prices_serialize_as_numbers() {
        let mut doc = BasePriceDocument::new(BasePriceMap::from([
            ("a".to_string(), dec!(1000)),
            ("b".to_string(), dec!(99.90)),
        ]));
        doc.stamp("2026-10-19T09:30:00Z".parse().unwrap());

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "prices": {"a": 1000, "b": 99.9},
                "_updated_at": "2026-10-19T09:30:00Z",
                "_count": 2
            })
        );
    }

    #[test]
    fn config_document_keeps_unknown_keys() {
        let doc = ConfigDocument::from_json(
            r#"{"pricing":{"current_multiplier":1.15,"step":"0.05"},"_updated_by":"n8n","notes":{"a":1}}"#,
        )
        .unwrap();
        assert_eq!(doc.pricing.current_multiplier, dec!(1.15));
        assert_eq!(doc.pricing.baseline_orders_day, dec!(45));

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_updated_by"], "n8n");
        assert_eq!(json["notes"]["a"], 1);
        assert_eq!(json["pricing"]["current_multiplier"], 1.15);
    }

    #[test]
    fn invalid_pricing_is_a_validation_failure() {
        let err = ConfigDocument::from_json(r#"{"pricing":{"step":0}}"#).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Store(StoreError::Validation { .. })
        ));
    }

    #[test]
    fn applied_multipliers_round_trip() {
        let doc = BasePriceDocument::from_json(
            r#"{"prices":{"a":1000},"applied_multipliers":{"a":1.2,"b":"junk"}}"#,
        )
        .unwrap();
        let state = doc.into_state();
        assert_eq!(state.applied, AppliedMultipliers::from([("a".to_string(), dec!(1.2))]));

        let json = serde_json::to_value(BasePriceDocument::from_state(&state)).unwrap();
        assert_eq!(json["applied_multipliers"], serde_json::json!({"a": 1.2}));
    }
}
