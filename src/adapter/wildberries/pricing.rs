//! Wildberries list price + discount arithmetic.
//!
//! Wildberries stores a list price and a whole-percent discount; the buyer
//! pays `price × (1 − discount / 100)`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::app::WbPushMode;
use crate::domain::money::{round_dp, round_units};
use crate::domain::{prices_match, Price};

/// Largest discount Wildberries accepts.
pub const MAX_DISCOUNT: u8 = 99;

/// Price the buyer pays.
///
/// Uses the reported discounted price when present, otherwise derives it
/// from the list price and discount.
#[must_use]
pub fn effective_price(list_price: Price, discount: Decimal, discounted: Price) -> Price {
    if discounted > Decimal::ZERO {
        return discounted;
    }
    let derived = list_price * (Decimal::ONE - discount / dec!(100));
    round_dp(derived.max(Decimal::ZERO), 2)
}

/// Discount that brings `list_price` down to `target`, clamped to 0..=99.
#[must_use]
pub fn calculate_discount(list_price: Price, target: Price) -> u8 {
    if list_price <= Decimal::ZERO || target >= list_price {
        return 0;
    }
    let discount = round_units((Decimal::ONE - target / list_price) * dec!(100));
    discount
        .to_u8()
        .unwrap_or(MAX_DISCOUNT)
        .min(MAX_DISCOUNT)
}

/// A drop to below a third of the current price sends the product to
/// quarantine, where it keeps selling at the old price.
#[must_use]
pub fn will_trigger_quarantine(current: Price, target: Price) -> bool {
    target < current / dec!(3)
}

/// List price and discount to upload for a target price.
///
/// Discount mode keeps the known list price when a whole-percent discount
/// lands within `tolerance` of the target. Otherwise the target becomes the
/// list price with no discount.
#[must_use]
pub fn encode(
    mode: WbPushMode,
    list_price: Option<Price>,
    target: Price,
    tolerance: Decimal,
) -> (Price, u8) {
    if let (WbPushMode::Discount, Some(list)) = (mode, list_price) {
        let list = round_units(list);
        if target < list {
            let discount = calculate_discount(list, target);
            let charged = effective_price(list, Decimal::from(discount), Decimal::ZERO);
            if prices_match(charged, target, tolerance) {
                return (list, discount);
            }
        }
    }
    (round_units(target), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_reaches_target() {
        assert_eq!(calculate_discount(dec!(2000), dec!(1500)), 25);
        assert_eq!(calculate_discount(dec!(1000), dec!(333)), 67);
    }

    #[test]
    fn discount_is_zero_when_target_not_below_list() {
        assert_eq!(calculate_discount(dec!(1000), dec!(1000)), 0);
        assert_eq!(calculate_discount(dec!(1000), dec!(1200)), 0);
        assert_eq!(calculate_discount(dec!(0), dec!(100)), 0);
    }

    #[test]
    fn discount_is_capped() {
        assert_eq!(calculate_discount(dec!(10000), dec!(1)), 99);
    }

    #[test]
    fn quarantine_below_a_third() {
        assert!(will_trigger_quarantine(dec!(900), dec!(299)));
        assert!(!will_trigger_quarantine(dec!(900), dec!(300)));
        assert!(!will_trigger_quarantine(dec!(0), dec!(0)));
    }

    #[test]
    fn effective_price_prefers_reported_value() {
        assert_eq!(effective_price(dec!(2000), dec!(25), dec!(1490)), dec!(1490));
        assert_eq!(effective_price(dec!(2000), dec!(25), dec!(0)), dec!(1500));
        assert_eq!(effective_price(dec!(2000), dec!(150), dec!(0)), dec!(0));
    }

    const TOLERANCE: Decimal = dec!(0.01);

    #[test]
    fn encode_modes() {
        assert_eq!(
            encode(WbPushMode::Discount, Some(dec!(2000)), dec!(1500), TOLERANCE),
            (dec!(2000), 25)
        );
        assert_eq!(
            encode(WbPushMode::Discount, Some(dec!(1000)), dec!(1200), TOLERANCE),
            (dec!(1200), 0)
        );
        assert_eq!(
            encode(WbPushMode::Discount, None, dec!(1200), TOLERANCE),
            (dec!(1200), 0)
        );
        assert_eq!(
            encode(WbPushMode::Price, Some(dec!(2000)), dec!(1500), TOLERANCE),
            (dec!(1500), 0)
        );
    }

    #[test]
    fn coarse_discount_falls_back_to_price_mode() {
        // 85% off 10000 charges 1500, 3% away from 1549
        assert_eq!(
            encode(WbPushMode::Discount, Some(dec!(10000)), dec!(1549), TOLERANCE),
            (dec!(1549), 0)
        );
        // 1500 is within 1% of 1502
        assert_eq!(
            encode(WbPushMode::Discount, Some(dec!(10000)), dec!(1502), TOLERANCE),
            (dec!(10000), 85)
        );
    }
}
