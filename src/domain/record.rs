//! Price snapshot records, base-price memory and correction outputs.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::Value;

use super::money::{coerce_price, round_units, Multiplier, Price};

/// Markup applied to a corrected price to produce the crossed-out
/// "was" price shown next to it.
pub const DISPLAY_MARKUP: Decimal = dec!(1.1);

/// Remembered un-multiplied price per offer.
///
/// Ordered so persisted documents are stable between runs.
pub type BasePriceMap = BTreeMap<String, Price>;

/// Multiplier each offer's live price reflects, per offer.
pub type AppliedMultipliers = BTreeMap<String, Multiplier>;

/// What a marketplace remembers between cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseState {
    pub prices: BasePriceMap,
    /// Offers whose live price still reflects an earlier multiplier.
    ///
    /// Every other offer is priced at the config's current multiplier.
    pub applied: AppliedMultipliers,
}

impl BaseState {
    /// Multiplier the offer's live price reflects.
    #[must_use]
    pub fn reflected(&self, offer_id: &str, current: Multiplier) -> Multiplier {
        self.applied.get(offer_id).copied().unwrap_or(current)
    }
}

impl From<BasePriceMap> for BaseState {
    fn from(prices: BasePriceMap) -> Self {
        Self {
            prices,
            applied: AppliedMultipliers::new(),
        }
    }
}

/// One product's effective price as seen on a marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRecord {
    pub offer_id: String,
    /// Price the buyer currently pays.
    pub price: Price,
    /// Marketplace floor; zero means no floor.
    pub min_price: Price,
}

impl PriceRecord {
    pub fn new(offer_id: impl Into<String>, price: Price, min_price: Price) -> Self {
        Self {
            offer_id: offer_id.into(),
            price,
            min_price,
        }
    }

    /// Build a record from raw API values, coercing malformed prices to zero.
    pub fn from_raw(
        offer_id: impl Into<String>,
        price: Option<&Value>,
        min_price: Option<&Value>,
    ) -> Self {
        Self::new(offer_id, coerce_price(price), coerce_price(min_price))
    }

    /// Whether the marketplace enforces a floor for this product.
    #[must_use]
    pub fn has_floor(&self) -> bool {
        self.min_price > Decimal::ZERO
    }
}

/// Inputs that produced a correction, kept for audit logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectionDebug {
    pub observed_price: Price,
    pub previous_base: Price,
    pub new_base: Price,
    pub multiplier: Multiplier,
    pub new_target: Price,
}

/// A marketplace price that must be pushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceCorrection {
    pub offer_id: String,
    pub new_price: Price,
    /// Cosmetic "was" price for discount framing.
    pub display_reference_price: Price,
    pub debug: CorrectionDebug,
}

impl PriceCorrection {
    pub fn new(offer_id: impl Into<String>, debug: CorrectionDebug) -> Self {
        let new_price = debug.new_target;
        Self {
            offer_id: offer_id.into(),
            new_price,
            display_reference_price: round_units(new_price * DISPLAY_MARKUP),
            debug,
        }
    }

    /// Effective price observed before the correction.
    #[must_use]
    pub fn observed_price(&self) -> Price {
        self.debug.observed_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_reference_is_rounded_separately() {
        let correction = PriceCorrection::new(
            "sku-1",
            CorrectionDebug {
                observed_price: dec!(999),
                previous_base: dec!(900),
                new_base: dec!(999),
                multiplier: dec!(1.05),
                new_target: dec!(1049),
            },
        );

        assert_eq!(correction.new_price, dec!(1049));
        // 1049 * 1.1 = 1153.9
        assert_eq!(correction.display_reference_price, dec!(1154));
    }

    #[test]
    fn from_raw_coerces_each_field() {
        let record = PriceRecord::from_raw("42", Some(&json!("1200")), None);
        assert_eq!(record.price, dec!(1200));
        assert_eq!(record.min_price, Decimal::ZERO);
        assert!(!record.has_floor());
    }
}
