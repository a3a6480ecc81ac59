//! Tolerance-based price comparison.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::money::Price;

/// Relative tolerance used when none is configured (1%).
pub const DEFAULT_TOLERANCE: Decimal = dec!(0.01);

/// Check whether `observed` is within `tolerance` of `expected`.
///
/// The difference is measured relative to `expected`, so the comparison is
/// not symmetric. A difference exactly at the tolerance is a mismatch. An
/// expected price of zero only matches an observed price of zero.
#[must_use]
pub fn prices_match(observed: Price, expected: Price, tolerance: Decimal) -> bool {
    if expected.is_zero() {
        return observed.is_zero();
    }
    let diff = (observed - expected).abs() / expected;
    diff < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_one_percent_off_matches() {
        assert!(prices_match(dec!(99.5), dec!(100), DEFAULT_TOLERANCE));
        assert!(prices_match(dec!(100.9), dec!(100), DEFAULT_TOLERANCE));
    }

    #[test]
    fn exactly_at_tolerance_is_a_mismatch() {
        assert!(!prices_match(dec!(99), dec!(100), DEFAULT_TOLERANCE));
        assert!(!prices_match(dec!(101), dec!(100), DEFAULT_TOLERANCE));
    }

    #[test]
    fn two_percent_off_does_not_match() {
        assert!(!prices_match(dec!(98), dec!(100), DEFAULT_TOLERANCE));
    }

    #[test]
    fn zero_expected_requires_zero_observed() {
        assert!(prices_match(Decimal::ZERO, Decimal::ZERO, DEFAULT_TOLERANCE));
        assert!(!prices_match(dec!(0.01), Decimal::ZERO, DEFAULT_TOLERANCE));
        assert!(!prices_match(dec!(100), Decimal::ZERO, dec!(1000)));
    }

    #[test]
    fn comparison_is_relative_to_expected() {
        // 10 / 100 = 0.10 vs 10 / 110 ≈ 0.0909
        assert!(!prices_match(dec!(110), dec!(100), dec!(0.1)));
        assert!(prices_match(dec!(100), dec!(110), dec!(0.1)));
    }
}
