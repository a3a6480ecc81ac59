//! Local-day time for the demand pace.

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{ConfigError, Result};

/// Moscow time, UTC+3 with no daylight saving.
pub const MOSCOW_UTC_OFFSET_HOURS: i32 = 3;

/// Fixed offset from whole hours east of UTC.
#[allow(clippy::result_large_err)]
pub fn fixed_offset(hours: i32) -> Result<FixedOffset> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            ConfigError::InvalidValue {
                field: "utc_offset_hours",
                reason: format!("{hours} is not a valid UTC offset"),
            }
            .into()
        })
}

/// Hours since local midnight: `hour + minute / 60`.
#[must_use]
pub fn local_day_hours(now: DateTime<Utc>, offset: FixedOffset) -> Decimal {
    let local = now.with_timezone(&offset);
    Decimal::from(local.hour()) + Decimal::from(local.minute()) / dec!(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn moscow_is_three_hours_ahead() {
        let offset = fixed_offset(MOSCOW_UTC_OFFSET_HOURS).unwrap();
        assert_eq!(local_day_hours(at("2026-10-19T13:30:00Z"), offset), dec!(16.5));
    }

    #[test]
    fn wraps_past_local_midnight() {
        let offset = fixed_offset(MOSCOW_UTC_OFFSET_HOURS).unwrap();
        assert_eq!(local_day_hours(at("2026-10-19T21:00:00Z"), offset), dec!(0));
    }

    #[test]
    fn seconds_are_ignored() {
        let offset = fixed_offset(0).unwrap();
        assert_eq!(local_day_hours(at("2026-10-19T06:45:59Z"), offset), dec!(6.75));
    }

    #[test]
    fn rejects_impossible_offsets() {
        assert!(fixed_offset(30).is_err());
    }
}
