//! Millisecond arithmetic on wall-clock times.
//!
//! Every duration in the engine is a whole number of milliseconds. Times of
//! day are `chrono::NaiveTime` values truncated to millisecond resolution.

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;

/// A duration in milliseconds.
pub type Milliseconds = i64;

/// Number of milliseconds in one calendar day.
pub const MILLIS_PER_DAY: Milliseconds = 86_400_000;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Returns the number of milliseconds elapsed since midnight at `time`.
///
/// Sub-millisecond precision is discarded. A leap-second representation
/// (nanoseconds >= 1e9) is clamped to the last millisecond of its second.
///
/// # Example
///
/// ```
/// use shift_sla::models::millis_from_midnight;
/// use chrono::NaiveTime;
///
/// let time = NaiveTime::from_hms_milli_opt(8, 30, 0, 250).unwrap();
/// assert_eq!(millis_from_midnight(time), 30_600_250);
/// ```
pub fn millis_from_midnight(time: NaiveTime) -> Milliseconds {
    let seconds = i64::from(time.num_seconds_from_midnight());
    let millis = i64::from((time.nanosecond() / 1_000_000).min(999));
    seconds * 1000 + millis
}

/// Drops everything below millisecond resolution from `time`.
pub(crate) fn truncate_to_millis(time: NaiveTime) -> NaiveTime {
    let millis = (time.nanosecond() / 1_000_000).min(999);
    time.with_nanosecond(millis * 1_000_000).unwrap_or(time)
}

/// Converts milliseconds to hours.
///
/// # Example
///
/// ```
/// use shift_sla::models::to_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(to_hours(5_400_000), Decimal::new(15, 1)); // 1.5 hours
/// ```
pub fn to_hours(millis: Milliseconds) -> Decimal {
    (Decimal::new(millis, 0) / Decimal::new(MILLIS_PER_HOUR, 0)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midnight_is_zero() {
        assert_eq!(millis_from_midnight(NaiveTime::MIN), 0);
    }

    #[test]
    fn test_last_millisecond_of_day() {
        let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap();
        assert_eq!(millis_from_midnight(time), MILLIS_PER_DAY - 1);
    }

    #[test]
    fn test_sub_millisecond_precision_is_dropped() {
        let time = NaiveTime::from_hms_micro_opt(0, 0, 1, 1_999).unwrap();
        assert_eq!(millis_from_midnight(time), 1_001);
        assert_eq!(
            truncate_to_millis(time),
            NaiveTime::from_hms_milli_opt(0, 0, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_leap_second_is_clamped() {
        let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 1_500).unwrap();
        assert_eq!(millis_from_midnight(time), MILLIS_PER_DAY - 1);
    }

    #[test]
    fn test_to_hours() {
        assert_eq!(to_hours(0), Decimal::ZERO);
        assert_eq!(to_hours(7_200_000), Decimal::new(2, 0));
        assert_eq!(to_hours(900_000), Decimal::new(25, 2));
    }
}
